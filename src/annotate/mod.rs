//! Linguistic annotation of query text.
//!
//! The interpreter only depends on the [`Annotator`] trait. The built-in
//! [`LexiconAnnotator`] is a small deterministic tagger tuned to the
//! question vocabulary of the users/orders dataset:
//!
//! ```text
//! "show orders for wireless mouse"
//!   show     VERB  ROOT
//!   orders   NOUN  dobj     -> show
//!   for      ADP   prep     -> orders
//!   wireless ADJ   amod     -> mouse
//!   mouse    NOUN  pobj     -> for
//! ```

mod deps;
mod entities;
mod lexer;
mod lexicon;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

pub use lexer::{RawToken, tokenize};
pub use lexicon::like_num;

/// Coarse part-of-speech tag (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Verb,
    X,
}

impl Pos {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Adj => "ADJ",
            Pos::Adp => "ADP",
            Pos::Adv => "ADV",
            Pos::Aux => "AUX",
            Pos::Cconj => "CCONJ",
            Pos::Det => "DET",
            Pos::Noun => "NOUN",
            Pos::Num => "NUM",
            Pos::Part => "PART",
            Pos::Pron => "PRON",
            Pos::Propn => "PROPN",
            Pos::Punct => "PUNCT",
            Pos::Sconj => "SCONJ",
            Pos::Verb => "VERB",
            Pos::X => "X",
        }
    }

    /// Nouns and proper nouns.
    pub fn is_nominal(&self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency relation to the token's head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dep {
    Root,
    Nsubj,
    Dobj,
    Pobj,
    Prep,
    Compound,
    Amod,
    Det,
    Nummod,
    Aux,
    Advmod,
    Acl,
    Cc,
    Conj,
    Punct,
    Dep,
}

impl Dep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dep::Root => "ROOT",
            Dep::Nsubj => "nsubj",
            Dep::Dobj => "dobj",
            Dep::Pobj => "pobj",
            Dep::Prep => "prep",
            Dep::Compound => "compound",
            Dep::Amod => "amod",
            Dep::Det => "det",
            Dep::Nummod => "nummod",
            Dep::Aux => "aux",
            Dep::Advmod => "advmod",
            Dep::Acl => "acl",
            Dep::Cc => "cc",
            Dep::Conj => "conj",
            Dep::Punct => "punct",
            Dep::Dep => "dep",
        }
    }
}

impl fmt::Display for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One token of the annotated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedToken {
    /// Position in the token sequence.
    pub index: usize,
    pub text: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the head token. The root points at itself.
    pub head: usize,
    pub like_num: bool,
}

/// Entity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    Date,
    Cardinal,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Date => "DATE",
            EntityLabel::Cardinal => "CARDINAL",
        })
    }
}

/// A labelled run of tokens `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Tokens plus entities for one query, both in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotation {
    pub tokens: Vec<AnnotatedToken>,
    pub entities: Vec<EntitySpan>,
}

impl Annotation {
    /// Text of the head of `token`.
    pub fn head_text(&self, token: &AnnotatedToken) -> Option<&str> {
        self.tokens.get(token.head).map(|t| t.text.as_str())
    }

    /// First entity with the given label.
    pub fn first_entity(&self, label: EntityLabel) -> Option<&EntitySpan> {
        self.entities.iter().find(|e| e.label == label)
    }

    /// Index of the first token whose text equals `word`.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t.text == word)
    }
}

/// Produces tokens and entities for a piece of text.
///
/// Implementations must be deterministic: the same text always yields the
/// same annotation.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Annotation;
}

/// Rule-based annotator backed by built-in word lists.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnnotator {
    extra_names: HashSet<String>,
}

impl LexiconAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize additional person names (matched case-insensitively).
    pub fn with_person_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_names
            .extend(names.into_iter().map(|n| n.as_ref().trim().to_lowercase()));
        self
    }

    fn is_name(&self, word: &str) -> bool {
        lexicon::is_first_name(word) || self.extra_names.contains(word)
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Annotation {
        let raw = tokenize(text);

        let mut pos: Vec<Pos> = raw
            .iter()
            .map(|t| {
                if self.is_name(t.text) {
                    Pos::Propn
                } else {
                    lexicon::tag(t)
                }
            })
            .collect();

        let entities = entities::recognize(text, &raw, &pos, |w| self.is_name(w));
        for span in entities.iter().filter(|e| e.label == EntityLabel::Person) {
            for p in &mut pos[span.start..span.end] {
                *p = Pos::Propn;
            }
        }

        let arcs = deps::attach(&pos);

        let tokens = raw
            .iter()
            .zip(pos)
            .zip(arcs)
            .enumerate()
            .map(|(index, ((t, pos), (head, dep)))| AnnotatedToken {
                index,
                text: t.text.to_string(),
                pos,
                dep,
                head,
                like_num: like_num(t.text),
            })
            .collect();

        Annotation { tokens, entities }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> Annotation {
        LexiconAnnotator::new().annotate(text)
    }

    #[test]
    fn test_for_attaches_to_orders() {
        let ann = annotate("show orders for laptop");
        let for_tok = &ann.tokens[2];
        assert_eq!(for_tok.text, "for");
        assert_eq!(for_tok.pos, Pos::Adp);
        assert_eq!(ann.head_text(for_tok), Some("orders"));
        assert_eq!(ann.tokens[3].dep, Dep::Pobj);
    }

    #[test]
    fn test_person_entity() {
        let ann = annotate("find users named bob johnson");
        let person = ann.first_entity(EntityLabel::Person).unwrap();
        assert_eq!(person.text, "bob johnson");
        assert_eq!((person.start, person.end), (3, 5));
        assert_eq!(ann.tokens[3].pos, Pos::Propn);
        assert_eq!(ann.tokens[4].pos, Pos::Propn);
    }

    #[test]
    fn test_unknown_word_is_not_a_person() {
        let ann = annotate("users named zork");
        assert!(ann.first_entity(EntityLabel::Person).is_none());
    }

    #[test]
    fn test_extra_person_names() {
        let ann = LexiconAnnotator::new()
            .with_person_names(["Zork"])
            .annotate("users named zork");
        assert_eq!(ann.first_entity(EntityLabel::Person).unwrap().text, "zork");
    }

    #[test]
    fn test_iso_date_entity() {
        let ann = annotate("users registered after 2023-04-01");
        let date = ann.first_entity(EntityLabel::Date).unwrap();
        assert_eq!(date.text, "2023-04-01");
        assert!(!ann.tokens[3].like_num);
    }

    #[test]
    fn test_numbers_are_like_num() {
        let ann = annotate("orders by price greater than 100");
        let nums: Vec<&str> = ann
            .tokens
            .iter()
            .filter(|t| t.like_num)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(nums, vec!["100"]);
    }

    #[test]
    fn test_annotation_is_deterministic() {
        let a = annotate("orders from user alice smith");
        let b = annotate("orders from user alice smith");
        assert_eq!(a, b);
    }
}
