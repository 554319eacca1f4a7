//! Grammar constructs that may be legal at a cursor, and a compact set of them.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Something the user could type next.
///
/// Most constructs are a fixed keyword or punctuation. The placeholders (`ExistingCharSet`,
/// `ExistingToken`, `ExistingProduction`, `GrammarName`, `ProductionName`) stand for names
/// taken from the grammar itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LegalConstruct {
    Compiler,
    IgnoreCase,
    Characters,
    Tokens,
    Pragmas,
    Comments,
    CommentsFrom,
    CommentsTo,
    CommentsNested,
    Context,
    Ignore,
    Any,
    Plus,
    Minus,
    TokenRange,
    Productions,
    Period,
    ExistingCharSet,
    ExistingToken,
    LPar,
    RPar,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Alternative,
    SemanticActionStart,
    AttributeStart,
    AttributeStartAlt,
    ExistingProduction,
    Sync,
    Weak,
    If,
    GrammarName,
    End,
    ProductionName,
}

impl LegalConstruct {
    pub const COUNT: usize = 36;

    pub const ALL: [LegalConstruct; Self::COUNT] = [
        LegalConstruct::Compiler,
        LegalConstruct::IgnoreCase,
        LegalConstruct::Characters,
        LegalConstruct::Tokens,
        LegalConstruct::Pragmas,
        LegalConstruct::Comments,
        LegalConstruct::CommentsFrom,
        LegalConstruct::CommentsTo,
        LegalConstruct::CommentsNested,
        LegalConstruct::Context,
        LegalConstruct::Ignore,
        LegalConstruct::Any,
        LegalConstruct::Plus,
        LegalConstruct::Minus,
        LegalConstruct::TokenRange,
        LegalConstruct::Productions,
        LegalConstruct::Period,
        LegalConstruct::ExistingCharSet,
        LegalConstruct::ExistingToken,
        LegalConstruct::LPar,
        LegalConstruct::RPar,
        LegalConstruct::LBrack,
        LegalConstruct::RBrack,
        LegalConstruct::LBrace,
        LegalConstruct::RBrace,
        LegalConstruct::Alternative,
        LegalConstruct::SemanticActionStart,
        LegalConstruct::AttributeStart,
        LegalConstruct::AttributeStartAlt,
        LegalConstruct::ExistingProduction,
        LegalConstruct::Sync,
        LegalConstruct::Weak,
        LegalConstruct::If,
        LegalConstruct::GrammarName,
        LegalConstruct::End,
        LegalConstruct::ProductionName,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Text to insert, `None` for placeholders.
    pub fn keyword(self) -> Option<&'static str> {
        use LegalConstruct::*;
        let text = match self {
            Compiler => "COMPILER",
            IgnoreCase => "IGNORECASE",
            Characters => "CHARACTERS",
            Tokens => "TOKENS",
            Pragmas => "PRAGMAS",
            Comments => "COMMENTS",
            CommentsFrom => "FROM",
            CommentsTo => "TO",
            CommentsNested => "NESTED",
            Context => "CONTEXT",
            Ignore => "IGNORE",
            Any => "ANY",
            Plus => "+",
            Minus => "-",
            TokenRange => "..",
            Productions => "PRODUCTIONS",
            Period => ".",
            LPar => "(",
            RPar => ")",
            LBrack => "[",
            RBrack => "]",
            LBrace => "{",
            RBrace => "}",
            Alternative => "|",
            SemanticActionStart => "(.",
            AttributeStart => "<",
            AttributeStartAlt => "<.",
            Sync => "SYNC",
            Weak => "WEAK",
            If => "IF",
            End => "END",
            ExistingCharSet | ExistingToken | ExistingProduction | GrammarName | ProductionName => {
                return None
            }
        };
        Some(text)
    }

    pub fn is_placeholder(self) -> bool {
        self.keyword().is_none()
    }

    pub fn description(self) -> &'static str {
        use LegalConstruct::*;
        match self {
            Compiler => "Start of the grammar, followed by its name",
            IgnoreCase => "Make the scanner case insensitive",
            Characters => "Character set declarations",
            Tokens => "Token declarations",
            Pragmas => "Pragma declarations, tokens that may appear anywhere",
            Comments => "Comment declaration",
            CommentsFrom => "Start delimiter of a comment",
            CommentsTo => "End delimiter of a comment",
            CommentsNested => "Comments of this kind may nest",
            Context => "Trailing context of a token",
            Ignore => "Characters the scanner skips",
            Any => "Any character or token not otherwise expected here",
            Plus => "Set union",
            Minus => "Set difference",
            TokenRange => "Character range",
            Productions => "Production declarations",
            Period => "End of a declaration",
            ExistingCharSet => "Declared character set",
            ExistingToken => "Declared token",
            LPar => "Start of a group",
            RPar => "End of a group",
            LBrack => "Start of an option",
            RBrack => "End of an option",
            LBrace => "Start of an iteration",
            RBrace => "End of an iteration",
            Alternative => "Alternative",
            SemanticActionStart => "Semantic action",
            AttributeStart => "Attributes",
            AttributeStartAlt => "Attributes that may contain '>'",
            ExistingProduction => "Declared production",
            Sync => "Synchronisation point for error recovery",
            Weak => "Weak terminal for error recovery",
            If => "Conflict resolver",
            GrammarName => "Name of the grammar",
            End => "End of the grammar",
            ProductionName => "Name of a new production",
        }
    }
}

impl fmt::Display for LegalConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword() {
            Some(keyword) => f.write_str(keyword),
            None => write!(f, "<{self:?}>"),
        }
    }
}

const WORDS: usize = LegalConstruct::COUNT.div_ceil(64);

/// Bit set over [`LegalConstruct`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LegalConstructSet {
    bits: [u64; WORDS],
}

impl LegalConstructSet {
    pub const fn empty() -> Self {
        Self { bits: [0; WORDS] }
    }

    pub fn insert(&mut self, construct: LegalConstruct) {
        let index = construct.index();
        self.bits[index / 64] |= 1 << (index % 64);
    }

    pub fn remove(&mut self, construct: LegalConstruct) {
        let index = construct.index();
        self.bits[index / 64] &= !(1 << (index % 64));
    }

    pub fn contains(&self, construct: LegalConstruct) -> bool {
        let index = construct.index();
        self.bits[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// Members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = LegalConstruct> + '_ {
        LegalConstruct::ALL
            .into_iter()
            .filter(move |construct| self.contains(*construct))
    }
}

impl fmt::Debug for LegalConstructSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<LegalConstruct> for LegalConstructSet {
    fn from_iter<I: IntoIterator<Item = LegalConstruct>>(iter: I) -> Self {
        let mut set = Self::empty();
        for construct in iter {
            set.insert(construct);
        }
        set
    }
}

impl<const N: usize> From<[LegalConstruct; N]> for LegalConstructSet {
    fn from(constructs: [LegalConstruct; N]) -> Self {
        constructs.into_iter().collect()
    }
}

impl BitOr for LegalConstructSet {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

impl BitOrAssign for LegalConstructSet {
    fn bitor_assign(&mut self, rhs: Self) {
        for (word, other) in self.bits.iter_mut().zip(rhs.bits) {
            *word |= other;
        }
    }
}

impl Serialize for LegalConstructSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for construct in self.iter() {
            seq.serialize_element(&construct)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (index, construct) in LegalConstruct::ALL.iter().enumerate() {
            assert_eq!(construct.index(), index);
        }
    }

    #[test]
    fn insert_contains_remove() {
        let mut set = LegalConstructSet::empty();
        assert!(set.is_empty());
        set.insert(LegalConstruct::ProductionName);
        set.insert(LegalConstruct::Compiler);
        assert!(set.contains(LegalConstruct::ProductionName));
        assert!(!set.contains(LegalConstruct::End));
        assert_eq!(set.len(), 2);
        set.remove(LegalConstruct::Compiler);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![LegalConstruct::ProductionName]);
    }

    #[test]
    fn union() {
        let a = LegalConstructSet::from([LegalConstruct::LPar]);
        let b = LegalConstructSet::from([LegalConstruct::RPar, LegalConstruct::LPar]);
        assert_eq!((a | b).len(), 2);
    }

    #[test]
    fn placeholders_have_no_keyword() {
        let placeholders: Vec<_> = LegalConstruct::ALL
            .into_iter()
            .filter(|c| c.is_placeholder())
            .collect();
        assert_eq!(
            placeholders,
            vec![
                LegalConstruct::ExistingCharSet,
                LegalConstruct::ExistingToken,
                LegalConstruct::ExistingProduction,
                LegalConstruct::GrammarName,
                LegalConstruct::ProductionName,
            ]
        );
    }

    #[test]
    fn serializes_as_a_list() {
        let set = LegalConstructSet::from([LegalConstruct::End, LegalConstruct::Period]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Period","End"]"#);
    }
}
