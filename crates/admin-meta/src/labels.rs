//! Deriving human readable labels and URL paths from list keys and field paths.

use convert_case::{Case, Casing};

/// `firstName` becomes `First Name`.
pub fn humanize(identifier: &str) -> String {
    identifier.to_case(Case::Title)
}

/// English plural of the last word of `singular`.
pub fn pluralize(singular: &str) -> String {
    let lower = singular.to_lowercase();
    let ends_with_consonant_y = lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
    if ends_with_consonant_y {
        format!("{}ies", &singular[..singular.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        format!("{singular}es")
    } else {
        format!("{singular}s")
    }
}

/// `Blog Posts` becomes `blog-posts`.
pub fn kebab_case(label: &str) -> String {
    label.to_case(Case::Kebab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn humanizes_identifiers() {
        assert_eq!(humanize("firstName"), "First Name");
        assert_eq!(humanize("BlogPost"), "Blog Post");
        assert_eq!(humanize("blog_post"), "Blog Post");
        assert_eq!(humanize("HTMLPage"), "Html Page");
        assert_eq!(humanize("id"), "Id");
    }

    #[test]
    fn pluralizes_words() {
        assert_eq!(pluralize("Post"), "Posts");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Blog Post"), "Blog Posts");
    }

    #[test]
    fn kebab_cases_labels() {
        assert_eq!(kebab_case("Blog Posts"), "blog-posts");
        assert_eq!(kebab_case("Users"), "users");
    }
}
