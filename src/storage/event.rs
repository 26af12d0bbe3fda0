use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

/// Channel name storage events are emitted on.
pub const STORAGE_EVENT: &str = "storage";

/// Describes one completed mutation of a storage area.
///
/// Serializes to the DOM `StorageEvent` shape:
/// `{"key", "oldValue", "newValue", "storageArea", "url"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Changed key, `None` after a `clear()`.
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Contents of the area after the mutation, in insertion order.
    pub storage_area: IndexMap<String, String>,
    /// Address of the document the change came from. Areas have no document,
    /// so the events they emit leave this `None`; a host relaying the event into
    /// a page attaches one with [`with_url`](Self::with_url). Typed as [`Url`]
    /// so only well-formed addresses reach listeners.
    pub url: Option<Url>,
}

impl StorageEvent {
    pub fn item_set(
        key: &str,
        old_value: Option<String>,
        new_value: String,
        storage_area: IndexMap<String, String>,
    ) -> Self {
        Self {
            key: Some(key.to_string()),
            old_value,
            new_value: Some(new_value),
            storage_area,
            url: None,
        }
    }

    pub fn item_removed(key: &str, old_value: Option<String>, storage_area: IndexMap<String, String>) -> Self {
        Self {
            key: Some(key.to_string()),
            old_value,
            new_value: None,
            storage_area,
            url: None,
        }
    }

    /// Same event, attributed to the document at `url`.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn cleared() -> Self {
        Self {
            key: None,
            old_value: None,
            new_value: None,
            storage_area: IndexMap::new(),
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_event_serializes_to_dom_shape() {
        let mut area = IndexMap::new();
        area.insert("demo".to_string(), "v".to_string());
        let ev = StorageEvent::item_set("demo", None, "v".into(), area);

        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({
                "key": "demo",
                "oldValue": null,
                "newValue": "v",
                "storageArea": { "demo": "v" },
                "url": null,
            })
        );
    }

    #[test]
    fn cleared_event_is_all_null() {
        let ev = StorageEvent::cleared();
        assert!(ev.key.is_none());
        assert!(ev.old_value.is_none());
        assert!(ev.new_value.is_none());
        assert!(ev.storage_area.is_empty());
        assert!(ev.url.is_none());
        assert_eq!(
            serde_json::to_string(&ev).unwrap(),
            r#"{"key":null,"oldValue":null,"newValue":null,"storageArea":{},"url":null}"#
        );
    }

    #[test]
    fn relayed_event_carries_document_url() {
        let url = Url::parse("https://example.org/app?tab=1").unwrap();
        let ev = StorageEvent::item_removed("k", None, IndexMap::new()).with_url(url.clone());

        assert_eq!(ev.url.as_ref(), Some(&url));
        assert_eq!(serde_json::to_value(&ev).unwrap()["url"], json!("https://example.org/app?tab=1"));
        assert_eq!(StorageEvent::cleared().url, None);
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let mut area = IndexMap::new();
        area.insert("b".to_string(), "2".to_string());
        area.insert("a".to_string(), "1".to_string());
        let ev = StorageEvent::item_removed("c", Some("3".into()), area);

        assert_eq!(serde_json::to_string(&ev.storage_area).unwrap(), r#"{"b":"2","a":"1"}"#);
        assert_eq!(ev.old_value.as_deref(), Some("3"));
        assert!(ev.new_value.is_none());
    }
}
