//! Typed ID definitions for dictionary entities and change requests.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker for members (contributors and administrators). Identity is owned by
/// the external auth layer; only the id is stored here.
pub struct Member;

/// Marker for change requests.
pub struct ChangeRequest;

pub struct Word;
pub struct Meaning;
pub struct Root;
pub struct PartOfSpeech;
pub struct WordAttribute;
pub struct MeaningAttribute;
pub struct Author;
pub struct Example;
pub struct Pronunciation;

/// Marker for rows of `related_words` and `related_phrases`.
pub struct WordRelation;

// ============================================================================
// Type aliases
// ============================================================================

pub type MemberId = Id<Member>;
pub type ChangeRequestId = Id<ChangeRequest>;
pub type WordId = Id<Word>;
pub type MeaningId = Id<Meaning>;
pub type RootId = Id<Root>;
pub type PartOfSpeechId = Id<PartOfSpeech>;
pub type WordAttributeId = Id<WordAttribute>;
pub type MeaningAttributeId = Id<MeaningAttribute>;
pub type AuthorId = Id<Author>;
pub type ExampleId = Id<Example>;
pub type PronunciationId = Id<Pronunciation>;
pub type WordRelationId = Id<WordRelation>;
