//! Module patterns, the output of the one-dimensional symbol encoders.

use std::fmt;


/// An immutable sequence of modules; `true` is a bar, `false` is a space.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ModulePattern {
    modules: Vec<bool>,
}
impl ModulePattern {
    pub fn len(&self) -> usize { self.modules.len() }
    pub fn is_empty(&self) -> bool { self.modules.is_empty() }
    pub fn modules(&self) -> &[bool] { self.modules.as_slice() }

    /// Returns the number of bar (`true`) modules.
    pub fn bar_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}
impl fmt::Display for ModulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for module in &self.modules {
            f.write_str(if *module { "1" } else { "0" })?;
        }
        Ok(())
    }
}


/// Collects modules while a pattern is being encoded.
///
/// Patterns only leave the builder through [`PatternBuilder::finish`], so an encoder that bails out
/// halfway never hands out a partial pattern.
#[derive(Debug, Default)]
pub(crate) struct PatternBuilder {
    modules: Vec<bool>,
}
impl PatternBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            modules: Vec::with_capacity(capacity),
        }
    }

    /// Appends modules given as a string of `0` and `1` characters.
    pub fn push_str(&mut self, bits: &str) {
        self.modules.extend(bits.bytes().map(|b| b == b'1'));
    }

    pub fn push(&mut self, bit: bool) {
        self.modules.push(bit);
    }

    pub fn finish(self) -> ModulePattern {
        ModulePattern {
            modules: self.modules,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::PatternBuilder;

    #[test]
    fn test_display() {
        let mut builder = PatternBuilder::default();
        builder.push_str("101");
        builder.push(false);
        builder.push(true);
        builder.push(true);
        let pattern = builder.finish();

        assert_eq!(pattern.to_string(), "101011");
        assert_eq!(pattern.len(), 6);
        assert_eq!(pattern.bar_count(), 4);
    }
}
