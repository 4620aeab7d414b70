use crate::codec::{KeyCodec, ScalarCodec, SerdeScalarCodec, UrlKeyCodec};
use crate::error::Result;
use crate::melt::flatten::Flattener;
use crate::melt::reconstruct::Reconstructor;
use crate::schema::Entity;
use crate::types::{AttributeList, SerializerConfig};
use tracing::debug;

/// Saves entity graphs as flat attribute lists and loads them back
#[derive(Debug, Clone, Default)]
pub struct Serializer<S = SerdeScalarCodec, K = UrlKeyCodec> {
    config: SerializerConfig,
    scalars: S,
    keys: K,
}

impl Serializer {
    pub fn new(config: SerializerConfig) -> Self {
        Serializer {
            config,
            scalars: SerdeScalarCodec,
            keys: UrlKeyCodec,
        }
    }
}

impl<S: ScalarCodec, K: KeyCodec> Serializer<S, K> {
    pub fn with_codecs(config: SerializerConfig, scalars: S, keys: K) -> Self {
        Serializer {
            config,
            scalars,
            keys,
        }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Flatten `entity` and its relations up to the depth cap.
    ///
    /// The root's own primary key is not emitted.
    pub fn save<E: Entity>(&self, entity: &E) -> Result<AttributeList> {
        let flattener = Flattener::new(&self.config, &self.scalars, &self.keys);
        let attributes = flattener.flatten(entity, "", false, 0)?;
        debug!(attributes = attributes.len(), "saved entity");
        Ok(attributes)
    }

    /// Load a new record from `attributes`
    pub fn load<E: Entity>(&self, attributes: AttributeList) -> Result<E> {
        let mut entity = E::default();
        self.load_into(&mut entity, attributes)?;
        Ok(entity)
    }

    /// Load `attributes` into `entity`
    pub fn load_into<E: Entity>(&self, entity: &mut E, mut attributes: AttributeList) -> Result<()> {
        self.load_from(entity, &mut attributes)
    }

    /// Load from a list the caller keeps.
    ///
    /// Consumed attributes are removed; whatever is left afterwards was not
    /// reachable (beyond the depth cap, unknown relations, surplus
    /// duplicates). Fails with `InvalidEntityKind` when `entity` is not a
    /// record and with `NoMoreProperties` when the root record has no
    /// attributes. After any failure `entity` may be partially loaded
    /// and must not be reused.
    pub fn load_from<E: Entity>(&self, entity: &mut E, attributes: &mut AttributeList) -> Result<()> {
        self.scalars.ensure_record(entity)?;

        let total = attributes.len();
        let reconstructor = Reconstructor::new(&self.config, &self.scalars, &self.keys);
        reconstructor.load(entity, attributes, "", 0)?;
        debug!(
            consumed = total - attributes.len(),
            leftover = attributes.len(),
            "loaded entity"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerializerError;
    use crate::schema::{FieldTag, RelationVisitor, RelationVisitorMut};
    use crate::types::Attribute;
    use serde::{Deserialize, Serialize};

    const SECTIONS: FieldTag = FieldTag::new("sections", "relation,sections");

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Page {
        title: String,
        #[serde(skip)]
        sections: Vec<Page>,
    }

    impl Entity for Page {
        fn visit_relations<V: RelationVisitor>(&self, visitor: &mut V) -> Result<()> {
            visitor.repeated(SECTIONS, &self.sections)
        }

        fn visit_relations_mut<V: RelationVisitorMut>(&mut self, visitor: &mut V) -> Result<()> {
            visitor.repeated(SECTIONS, &mut self.sections)
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Counter(i64);

    impl Entity for Counter {}

    fn page(title: &str, sections: Vec<Page>) -> Page {
        Page {
            title: title.to_string(),
            sections,
        }
    }

    #[test]
    fn test_save_and_load() {
        let serializer = Serializer::new(SerializerConfig::default());
        let original = page("root", vec![page("a", vec![page("a1", vec![])]), page("b", vec![])]);

        let attributes = serializer.save(&original).unwrap();
        assert!(attributes[1..].iter().all(|a| a.multiple));

        let loaded: Page = serializer.load(attributes).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_from_reports_leftovers() {
        let serializer = Serializer::new(SerializerConfig { max_depth: 1 });
        let mut attributes = vec![
            Attribute::new("title", "root"),
            Attribute::new("sections.title", "a"),
            Attribute::new("sections.sections.title", "a1"),
        ];

        let mut loaded = Page::default();
        serializer.load_from(&mut loaded, &mut attributes).unwrap();

        assert_eq!(loaded, page("root", vec![page("a", vec![])]));
        assert_eq!(attributes, vec![Attribute::new("sections.sections.title", "a1")]);
    }

    #[test]
    fn test_empty_list_fails_at_root() {
        let serializer: Serializer = Serializer::default();
        let err = serializer.load::<Page>(Vec::new()).unwrap_err();
        assert!(err.is_no_more_properties());
    }

    #[test]
    fn test_non_record_fails_before_loading() {
        let serializer = Serializer::new(SerializerConfig::default());
        let mut attributes = vec![Attribute::new("count", 1i64)];

        let mut counter = Counter::default();
        let err = serializer.load_from(&mut counter, &mut attributes).unwrap_err();

        assert!(matches!(err, SerializerError::InvalidEntityKind(_)));
        assert_eq!(attributes.len(), 1);
    }
}
