use std::fmt::{self, Write};

use crate::{Link, OrderedMap};

/// Optional human-readable rendering of a key or value for
/// [`OrderedMap::dump`]. The default says nothing, which leaves only the
/// item's address in the dump; `impl Describe for MyType {}` is enough to
/// make a type dumpable.
pub trait Describe {
    fn describe(&self) -> Option<String> {
        None
    }
}

impl Describe for str {
    fn describe(&self) -> Option<String> {
        Some(format!("{self:?}"))
    }
}

impl Describe for String {
    fn describe(&self) -> Option<String> {
        self.as_str().describe()
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> Option<String> {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe(&self) -> Option<String> {
        (**self).describe()
    }
}

impl Describe for () {}

macro_rules! describe_with_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

describe_with_display!(
    bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

/// Indented, brace-nested rendering of every node: id, color, key and value
/// (address plus description when there is one), parent and children.
/// Meant for eyes, not for parsing.
pub struct Dump<'a, K, V, S> {
    map: &'a OrderedMap<K, V, S>,
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// # Examples
    ///
    /// ```
    /// use rbmap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert("k".to_string(), 1u8);
    /// let out = map.dump().to_string();
    /// assert!(out.starts_with("OrderedMap (1 entries):"));
    /// assert!(out.contains("Color        BLACK"));
    /// assert!(out.contains("\"k\""));
    /// ```
    pub fn dump(&self) -> Dump<'_, K, V, S> {
        Dump { map: self }
    }
}

impl<K: Describe, V: Describe, S> Dump<'_, K, V, S> {
    fn node(&self, f: &mut fmt::Formatter<'_>, link: Link, indent: usize) -> fmt::Result {
        let Some(id) = link else {
            return Ok(());
        };
        let Some(node) = self.map.arena.get(link) else {
            return Ok(());
        };
        let pad = indent + 2;
        writeln!(f, "{:indent$}{{", "")?;
        writeln!(f, "{:pad$}Node         {id}", "")?;
        writeln!(f, "{:pad$}Color        {}", "", node.color)?;
        writeln!(f, "{:pad$}Key          {}", "", item(&node.key))?;
        writeln!(f, "{:pad$}Value        {}", "", item(&node.value))?;
        writeln!(f)?;
        writeln!(f, "{:pad$}Parent       {}", "", relative(node.parent))?;
        writeln!(f, "{:pad$}Left Child:  {}", "", relative(node.left))?;
        self.node(f, node.left, pad)?;
        writeln!(f, "{:pad$}Right Child: {}", "", relative(node.right))?;
        self.node(f, node.right, pad)?;
        writeln!(f, "{:indent$}}}", "")
    }
}

fn item<T: Describe>(item: &T) -> String {
    let mut out = format!("{:p}", item);
    if let Some(description) = item.describe() {
        let _ = write!(out, "  {description}");
    }
    out
}

fn relative(link: Link) -> String {
    link.map_or_else(|| "(none)".to_string(), |id| id.to_string())
}

impl<K: Describe, V: Describe, S> fmt::Display for Dump<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OrderedMap ({} entries):", self.map.len)?;
        self.node(f, self.map.root, 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Silent;
    use pretty_assertions::assert_eq;

    struct Opaque(#[allow(dead_code)] u8);

    impl Describe for Opaque {}

    #[test]
    fn builtin_descriptions() {
        assert_eq!(Some("\"a b\"".to_string()), "a b".describe());
        assert_eq!(Some("\"x\"".to_string()), String::from("x").describe());
        assert_eq!(Some("42".to_string()), 42u32.describe());
        assert_eq!(Some("true".to_string()), true.describe());
        assert_eq!(Some("-1.5".to_string()), Box::new(-1.5f64).describe());
        assert_eq!(None, ().describe());
        assert_eq!(None, Opaque(0).describe());
    }

    #[test]
    fn dump_nests_children_and_falls_back_to_addresses() {
        let mut map = OrderedMap::with_sink(Silent);
        map.insert(2u32, Opaque(2));
        map.insert(1, Opaque(1));
        map.insert(3, Opaque(3));

        let out = map.dump().to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!("OrderedMap (3 entries):", lines[0]);
        assert_eq!("{", lines[1]);
        assert_eq!("  Node         #0", lines[2]);
        assert_eq!("  Color        BLACK", lines[3]);
        assert!(lines[4].starts_with("  Key          0x"));
        assert!(lines[4].ends_with("  2"));
        assert!(lines[5].starts_with("  Value        0x"));
        assert!(!lines[5].contains("  Opaque"));
        assert_eq!("", lines[6]);
        assert_eq!("  Parent       (none)", lines[7]);
        assert_eq!("  Left Child:  #1", lines[8]);
        assert_eq!("  {", lines[9]);
        assert_eq!("    Node         #1", lines[10]);
        assert_eq!("    Color        RED", lines[11]);
        assert_eq!("    Parent       #0", lines[15]);
        assert_eq!("    Left Child:  (none)", lines[16]);
        assert_eq!("    Right Child: (none)", lines[17]);
        assert_eq!("  }", lines[18]);
        assert_eq!("  Right Child: #2", lines[19]);
        assert_eq!("}", lines.last().copied().unwrap());
    }

    #[test]
    fn dump_of_empty_map_is_a_header() {
        let map = OrderedMap::<u8, u8, Silent>::with_sink(Silent);
        assert_eq!("OrderedMap (0 entries):\n", map.dump().to_string());
    }
}
