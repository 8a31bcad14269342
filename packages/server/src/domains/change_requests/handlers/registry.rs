//! Handler registry.
//!
//! Maps `(EntityKind, Action)` to the handler that applies it. The standard
//! table is decided by one exhaustive `match`, so a new entity kind does not
//! compile until each of its actions is either given a handler or explicitly
//! left unregistered. The registry is immutable once built.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use super::{
    ChangeHandler, DeleteHandler, ExampleCreateHandler, ExampleUpdateHandler,
    MeaningCreateHandler, MeaningUpdateHandler, PronunciationCreateHandler,
    PronunciationUpdateHandler, RelationCreateHandler, VocabularyCreateHandler,
    VocabularyUpdateHandler, WordCreateHandler, WordUpdateHandler,
};
use crate::domains::change_requests::models::{Action, EntityKind};
use crate::domains::dictionary::{
    Example, Meaning, Pronunciation, RelationKind, Vocabulary, Word,
};

lazy_static! {
    static ref STANDARD: HandlerRegistry = HandlerRegistry::standard();
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<(EntityKind, Action), Arc<dyn ChangeHandler>>,
}

impl HandlerRegistry {
    /// The process-wide registry with every standard handler.
    pub fn global() -> &'static HandlerRegistry {
        &STANDARD
    }

    pub fn standard() -> Self {
        let handlers = EntityKind::ALL
            .iter()
            .flat_map(|&kind| Action::ALL.iter().map(move |&action| (kind, action)))
            .filter_map(|pair| standard_handler(pair.0, pair.1).map(|handler| (pair, handler)))
            .collect();
        Self { handlers }
    }

    /// Builds a registry from an explicit list, for embedding or tests.
    pub fn from_handlers(
        entries: impl IntoIterator<Item = ((EntityKind, Action), Arc<dyn ChangeHandler>)>,
    ) -> Self {
        Self {
            handlers: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, entity_kind: EntityKind, action: Action) -> Option<&dyn ChangeHandler> {
        self.handlers
            .get(&(entity_kind, action))
            .map(|handler| handler.as_ref())
    }

    pub fn is_registered(&self, entity_kind: EntityKind, action: Action) -> bool {
        self.handlers.contains_key(&(entity_kind, action))
    }

    /// Registered pairs in declaration order of kinds and actions.
    pub fn registered_pairs(&self) -> Vec<(EntityKind, Action)> {
        EntityKind::ALL
            .iter()
            .flat_map(|&kind| Action::ALL.iter().map(move |&action| (kind, action)))
            .filter(|&(kind, action)| self.is_registered(kind, action))
            .collect()
    }
}

/// Looks up a handler in the process-wide registry.
pub fn get_handler(entity_kind: EntityKind, action: Action) -> Option<&'static dyn ChangeHandler> {
    HandlerRegistry::global().get(entity_kind, action)
}

fn standard_handler(entity_kind: EntityKind, action: Action) -> Option<Arc<dyn ChangeHandler>> {
    use Action::{Create, Delete, Update};
    use EntityKind as K;

    let handler: Arc<dyn ChangeHandler> = match (entity_kind, action) {
        (K::Word, Create) => Arc::new(WordCreateHandler),
        (K::Word, Update) => Arc::new(WordUpdateHandler),
        (K::Word, Delete) => Arc::new(DeleteHandler::new(Word::TABLE)),

        (K::Meaning, Create) => Arc::new(MeaningCreateHandler),
        (K::Meaning, Update) => Arc::new(MeaningUpdateHandler),
        (K::Meaning, Delete) => Arc::new(DeleteHandler::new(Meaning::TABLE)),

        (K::Example, Create) => Arc::new(ExampleCreateHandler),
        (K::Example, Update) => Arc::new(ExampleUpdateHandler),
        (K::Example, Delete) => Arc::new(DeleteHandler::new(Example::TABLE)),

        (K::Pronunciation, Create) => Arc::new(PronunciationCreateHandler),
        (K::Pronunciation, Update) => Arc::new(PronunciationUpdateHandler),
        (K::Pronunciation, Delete) => Arc::new(DeleteHandler::new(Pronunciation::TABLE)),

        (K::Root, action) => vocabulary_handler(Vocabulary::Root, action),
        (K::PartOfSpeech, action) => vocabulary_handler(Vocabulary::PartOfSpeech, action),
        (K::WordAttribute, action) => vocabulary_handler(Vocabulary::WordAttribute, action),
        (K::MeaningAttribute, action) => vocabulary_handler(Vocabulary::MeaningAttribute, action),

        (K::Author, Create) => Arc::new(VocabularyCreateHandler(Vocabulary::Author)),
        (K::Author, Update) => Arc::new(VocabularyUpdateHandler(Vocabulary::Author)),
        // Authors are referenced by examples and are never removed through review.
        (K::Author, Delete) => return None,

        (K::RelatedWord, Create) => Arc::new(RelationCreateHandler(RelationKind::Word)),
        (K::RelatedWord, Delete) => Arc::new(DeleteHandler::new(RelationKind::Word.table())),
        (K::RelatedPhrase, Create) => Arc::new(RelationCreateHandler(RelationKind::Phrase)),
        (K::RelatedPhrase, Delete) => Arc::new(DeleteHandler::new(RelationKind::Phrase.table())),
        // A relation has no fields of its own; change it by delete and create.
        (K::RelatedWord | K::RelatedPhrase, Update) => return None,
    };

    Some(handler)
}

fn vocabulary_handler(vocabulary: Vocabulary, action: Action) -> Arc<dyn ChangeHandler> {
    match action {
        Action::Create => Arc::new(VocabularyCreateHandler(vocabulary)),
        Action::Update => Arc::new(VocabularyUpdateHandler(vocabulary)),
        Action::Delete => Arc::new(DeleteHandler::new(vocabulary.table())),
    }
}
