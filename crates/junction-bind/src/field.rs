//! Per-type field tables emitted by `#[derive(Bind)]`.

use crate::source::Tag;

/// Static description of one named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name.
    pub name: &'static str,
    /// `(tag, value)` pairs in priority order.
    pub tags: &'static [(Tag, &'static str)],
}

impl FieldSpec {
    /// The value of `tag`, if the field carries it.
    #[must_use]
    pub fn tag(&self, tag: Tag) -> Option<&'static str> {
        self.tags.iter().find(|(t, _)| *t == tag).map(|(_, v)| *v)
    }

    /// Name used in validation messages: the first tag value, else the field
    /// name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.tags.first().map_or(self.name, |(_, value)| *value)
    }

    /// Returns true if the field binds from no source.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Memory span of a field within a bound value, or of a validation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAddr {
    /// Start address.
    pub addr: usize,
    /// Size in bytes.
    pub size: usize,
    /// Index into the type's [`FieldSpec`] table.
    pub index: usize,
}

impl FieldAddr {
    /// Records the span of `field`, which is the `index`th field.
    pub fn of<F: ?Sized>(field: &F, index: usize) -> Self {
        let (addr, size) = span(field);
        Self { addr, size, index }
    }

    fn end(&self) -> usize {
        self.addr + self.size
    }
}

/// Start address and size of a referenced value.
pub(crate) fn span<F: ?Sized>(value: &F) -> (usize, usize) {
    let addr = std::ptr::from_ref(value).cast::<()>() as usize;
    (addr, std::mem::size_of_val(value))
}

/// Maps a target span to the index of the field that holds it.
///
/// An exact match wins. Otherwise the target must lie inside exactly one
/// non-empty field, which covers references into a field's interior.
pub(crate) fn locate(fields: &[FieldAddr], addr: usize, size: usize) -> Option<usize> {
    if let Some(field) = fields.iter().find(|f| f.addr == addr && f.size == size) {
        return Some(field.index);
    }
    fields
        .iter()
        .filter(|f| f.size > 0)
        .find(|f| addr >= f.addr && addr + size <= f.end() && addr < f.end())
        .map(|f| f.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: u64,
        right: [u8; 4],
    }

    fn addrs(pair: &Pair) -> Vec<FieldAddr> {
        vec![FieldAddr::of(&pair.left, 0), FieldAddr::of(&pair.right, 1)]
    }

    #[test]
    fn test_label_prefers_first_tag() {
        let spec = FieldSpec {
            name: "user_name",
            tags: &[(Tag::Json, "userName"), (Tag::Query, "user")],
        };
        assert_eq!(spec.label(), "userName");
        assert_eq!(spec.tag(Tag::Query), Some("user"));
        assert_eq!(spec.tag(Tag::Header), None);

        let bare = FieldSpec {
            name: "note",
            tags: &[],
        };
        assert_eq!(bare.label(), "note");
        assert!(bare.is_untagged());
    }

    #[test]
    fn test_locate_exact_field() {
        let pair = Pair {
            left: 1,
            right: [0; 4],
        };
        let table = addrs(&pair);
        let (addr, size) = span(&pair.right);
        assert_eq!(locate(&table, addr, size), Some(1));
        let (addr, size) = span(&pair.left);
        assert_eq!(locate(&table, addr, size), Some(0));
    }

    #[test]
    fn test_locate_interior_reference() {
        let pair = Pair {
            left: 1,
            right: [0; 4],
        };
        let table = addrs(&pair);
        let (addr, size) = span(&pair.right[2]);
        assert_eq!(locate(&table, addr, size), Some(1));
    }

    #[test]
    fn test_locate_foreign_address() {
        let pair = Pair {
            left: 1,
            right: [0; 4],
        };
        let other = 5_u64;
        let table = addrs(&pair);
        let (addr, size) = span(&other);
        assert_eq!(locate(&table, addr, size), None);
        assert_eq!(pair.left + u64::from(pair.right[0]), 1);
    }
}
