//! Partial page updates.
//!
//! A zone re-renders one subtree into a fresh markup tree; the client replaces the zone's
//! content with the serialized children of the zone element.

use std::collections::BTreeMap;

use markup::MarkupTree;
use serde::Serialize;

use crate::component::{ComponentKey, RenderTree};
use crate::error::{RenderError, RenderQueueError};
use crate::linker::StylesheetLink;
use crate::phase::PhaseError;
use crate::scheduler::Scheduler;

/// JSON payload for a partial page update: `{"zones": {id: html}, "stylesheets": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ZoneUpdate {
    pub zones: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stylesheets: Vec<StylesheetLink>,
}

impl ZoneUpdate {
    /// Folds another update in; later zone content replaces earlier content for the same id.
    pub fn merge(&mut self, other: ZoneUpdate) {
        self.zones.extend(other.zones);
        for link in other.stylesheets {
            if !self.stylesheets.iter().any(|l| l.href == link.href) {
                self.stylesheets.push(link);
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Scheduler {
    /// Renders the subtree at `zone` into `markup` and packages the content of the element
    /// whose DOM id is `zone_dom_id`. When no such element was written the whole fragment is
    /// used.
    pub fn render_partial(
        &self,
        tree: &mut RenderTree,
        zone: ComponentKey,
        zone_dom_id: &str,
        mut markup: MarkupTree,
    ) -> Result<ZoneUpdate, RenderQueueError> {
        let report = self.render_subtree(tree, zone, &mut markup)?;
        let content = match markup.element_by_id(zone_dom_id).map(|el| el.id()) {
            Some(element) => markup.serialize_children(element).map_err(|err| {
                let err = RenderError::Phase(PhaseError::from(err));
                self.fail(tree, zone, None, zone_dom_id, err, &markup)
            })?,
            None => {
                log::warn!(
                    target: "weft.render",
                    "zone element #{zone_dom_id} not rendered, sending the whole fragment"
                );
                markup.serialize()
            }
        };
        log::debug!(
            target: "weft.render",
            "zone {zone_dom_id}: {} byte(s), {} stylesheet(s)",
            content.len(),
            report.stylesheets.len()
        );
        let mut zones = BTreeMap::new();
        zones.insert(zone_dom_id.to_string(), content);
        Ok(ZoneUpdate {
            zones,
            stylesheets: report.stylesheets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let mut update = ZoneUpdate::default();
        update.zones.insert("results".into(), "<p>3 items</p>".into());
        assert_eq!(
            update.to_json().unwrap(),
            r#"{"zones":{"results":"<p>3 items</p>"}}"#
        );
        update.stylesheets.push(StylesheetLink {
            href: "/zone.css".into(),
            invariant: true,
        });
        assert_eq!(
            update.to_json().unwrap(),
            r#"{"zones":{"results":"<p>3 items</p>"},"stylesheets":[{"href":"/zone.css","invariant":true}]}"#
        );
    }

    #[test]
    fn merge_keeps_first_stylesheet_and_latest_zone() {
        let link = StylesheetLink {
            href: "/a.css".into(),
            invariant: false,
        };
        let mut first = ZoneUpdate::default();
        first.zones.insert("z".into(), "old".into());
        first.stylesheets.push(link.clone());
        let mut second = ZoneUpdate::default();
        second.zones.insert("z".into(), "new".into());
        second.stylesheets.push(link);
        first.merge(second);
        assert_eq!(first.zones["z"], "new");
        assert_eq!(first.stylesheets.len(), 1);
    }
}
