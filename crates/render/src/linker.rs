use core_types::{Asset, AssetCapability};
use markup::{MarkupError, MarkupTree};
use serde::Serialize;

/// A stylesheet reference collected during rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StylesheetLink {
    pub href: String,
    pub invariant: bool,
}

/// Collects stylesheets imported while rendering and links them into the document head once
/// the pass is done.
#[derive(Debug, Default)]
pub struct DocumentLinker {
    stylesheets: Vec<StylesheetLink>,
}

impl DocumentLinker {
    /// Imports are deduplicated by URL, first import keeps its position.
    pub fn import_stylesheet(&mut self, asset: &dyn Asset) {
        if !asset.supports(AssetCapability::Stylesheet) {
            log::warn!(
                target: "weft.render",
                "importing {} as a stylesheet but it does not declare the capability",
                asset.client_url()
            );
        }
        let href = asset.client_url();
        if self.stylesheets.iter().any(|link| link.href == href) {
            return;
        }
        self.stylesheets.push(StylesheetLink {
            href,
            invariant: asset.is_invariant(),
        });
    }

    pub fn stylesheets(&self) -> &[StylesheetLink] {
        &self.stylesheets
    }

    pub fn into_stylesheets(self) -> Vec<StylesheetLink> {
        self.stylesheets
    }

    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty()
    }

    /// Appends `<link rel="stylesheet">` elements to `html/head`. Returns how many were added;
    /// documents without a head are left alone.
    pub fn link_into_head(&self, markup: &mut MarkupTree) -> Result<usize, MarkupError> {
        if self.stylesheets.is_empty() {
            return Ok(0);
        }
        let Some(head) = markup.find("html/head").map(|head| head.id()) else {
            log::warn!(
                target: "weft.render",
                "{} stylesheet(s) imported but the document has no <head>",
                self.stylesheets.len()
            );
            return Ok(0);
        };
        let mut element = markup.element_mut(head)?;
        for link in &self.stylesheets {
            element.append_element(
                "link",
                &[("rel", Some("stylesheet")), ("href", Some(link.href.as_str()))],
            );
        }
        Ok(self.stylesheets.len())
    }
}

#[cfg(test)]
mod tests {
    use core_types::StaticAsset;
    use markup::MarkupConfig;

    use super::*;

    #[test]
    fn duplicate_imports_collapse() {
        let mut linker = DocumentLinker::default();
        linker.import_stylesheet(&StaticAsset::stylesheet("/a.css", true));
        linker.import_stylesheet(&StaticAsset::stylesheet("/b.css", false));
        linker.import_stylesheet(&StaticAsset::stylesheet("/a.css", true));
        let hrefs: Vec<_> = linker.stylesheets().iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/a.css", "/b.css"]);
    }

    #[test]
    fn links_land_in_head() {
        let mut markup = MarkupTree::new(MarkupConfig::default());
        markup.open_element("html", &[]);
        markup.open_element("head", &[]);
        markup.open_element("title", &[]);
        markup.write_text("t");
        markup.close_element().unwrap();
        markup.close_element().unwrap();
        markup.open_element("body", &[]);
        markup.close_element().unwrap();
        markup.close_element().unwrap();

        let mut linker = DocumentLinker::default();
        linker.import_stylesheet(&StaticAsset::stylesheet("/site.css", true));
        assert_eq!(linker.link_into_head(&mut markup).unwrap(), 1);
        assert_eq!(
            markup.serialize(),
            "<html><head><title>t</title><link rel=\"stylesheet\" href=\"/site.css\"></head><body></body></html>"
        );
    }

    #[test]
    fn missing_head_is_skipped() {
        let mut markup = MarkupTree::new(MarkupConfig::default());
        markup.open_element("div", &[]);
        markup.close_element().unwrap();
        let mut linker = DocumentLinker::default();
        linker.import_stylesheet(&StaticAsset::stylesheet("/site.css", true));
        assert_eq!(linker.link_into_head(&mut markup).unwrap(), 0);
        assert_eq!(markup.serialize(), "<div></div>");
    }
}
