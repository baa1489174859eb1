//! Rewrites build-time filesystem prefixes into served URL paths.
//!
//! `./public/assets/app.js`, `/public/assets/app.js` and
//! `public/assets/app.js` all become `/assets/app.js`.

use std::borrow::Cow;

use regex::{NoExpand, Regex};

use crate::config::PUBLIC_DIR;

#[derive(Debug, Clone)]
pub struct PathRewriter {
    pattern: Regex,
    replacement: String,
}

impl PathRewriter {
    /// Build a rewriter for `public/<folder>/`.
    pub fn new(folder: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?:\./|/)?{}/{}/",
            regex::escape(PUBLIC_DIR),
            regex::escape(folder)
        ))?;
        Ok(Self {
            pattern,
            replacement: format!("/{folder}/"),
        })
    }

    /// Replace every occurrence of the prefix.
    pub fn rewrite<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> PathRewriter {
        PathRewriter::new("assets").unwrap()
    }

    #[test]
    fn test_rewrite_forms() {
        let r = rewriter();
        assert_eq!(r.rewrite("public/assets/foo.js"), "/assets/foo.js");
        assert_eq!(r.rewrite("./public/assets/foo.js"), "/assets/foo.js");
        assert_eq!(r.rewrite("/public/assets/foo.js"), "/assets/foo.js");
    }

    #[test]
    fn test_rewrite_all_occurrences() {
        let r = rewriter();
        let map = r#"{"sources":["public/assets/a.orig.js","./public/assets/b.orig.js"]}"#;
        let out = r.rewrite(map);
        assert_eq!(out, r#"{"sources":["/assets/a.orig.js","/assets/b.orig.js"]}"#);
        assert!(!out.contains("public/assets/"));
    }

    #[test]
    fn test_rewrite_untouched_borrows() {
        let r = rewriter();
        assert!(matches!(r.rewrite("var a=1"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_custom_folder() {
        let r = PathRewriter::new("packs").unwrap();
        assert_eq!(
            r.rewrite("load('public/packs/x.js');public/assets/y.js"),
            "load('/packs/x.js');public/assets/y.js"
        );
    }

    #[test]
    fn test_folder_is_escaped() {
        let r = PathRewriter::new("a.b").unwrap();
        assert_eq!(r.rewrite("public/axb/x.js"), "public/axb/x.js");
        assert_eq!(r.rewrite("public/a.b/x.js"), "/a.b/x.js");
    }
}
