use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner shared by component keys and block ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Component-type id of a block (`"text"`, `"button"`, ...).
///
/// Interned: 4 bytes, `Copy`, O(1) equality. The component registry is
/// keyed by this.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(Spur);

impl ComponentKey {
    pub fn intern(s: &str) -> Self {
        ComponentKey(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

/// Identity of one placed block.
///
/// Every block on the canvas gets a fresh id when it is created, so two
/// blocks of the same component type still compare unequal. Commands that
/// target "this block" (e.g. replacing it from the property panel) look it
/// up by id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(Spur);

impl BlockId {
    pub fn intern(s: &str) -> Self {
        BlockId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Unique id for a block that arrived without one (e.g. imported JSON).
    pub fn anonymous() -> Self {
        Self::with_prefix("block")
    }

    /// Generate a unique id prefixed by the component key (`button_3`).
    pub fn fresh(key: ComponentKey) -> Self {
        Self::with_prefix(key.as_str())
    }

    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl Serialize for ComponentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ComponentKey::intern(&s))
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BlockId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_key_interning() {
        let a = ComponentKey::intern("button");
        let b = ComponentKey::intern("button");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "button");
    }

    #[test]
    fn fresh_block_ids_are_unique_and_prefixed() {
        let key = ComponentKey::intern("input");
        let a = BlockId::fresh(key);
        let b = BlockId::fresh(key);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("input_"));
    }
}
