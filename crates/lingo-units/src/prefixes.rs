use tracing::warn;

use lingo_core::traits::Translatable;

use crate::error::UnitError;
use crate::format::format_g;

/// Catalog context holding the comma-separated prefix table.
pub const PREFIXES_CONTEXT: &str = "si prefixes";
/// Catalog context holding the ASCII replacement for `µ`.
pub const MICRO_CONTEXT: &str = "si prefix alternative micro";
/// Source text of the prefix table, yocto through yotta; index 8 is unity.
pub const PREFIXES_SOURCE: &str = "y,z,a,f,p,n,µ,m, ,k,M,G,T,P,E,Z,Y";

const MICRO_SOURCE: &str = "u";
const UNITY: usize = 8;
const TABLE_LEN: usize = 17;
const MIN_MAGNITUDE: f64 = 1e-25;

/// SI prefix letters, possibly localized.
#[derive(Debug, Clone, PartialEq)]
pub struct SiPrefixes {
    unicode: Vec<String>,
    ascii: Vec<String>,
}

impl Default for SiPrefixes {
    fn default() -> Self {
        Self::from_table(PREFIXES_SOURCE, MICRO_SOURCE)
    }
}

impl SiPrefixes {
    /// Resolve the prefix table through `translator`.
    ///
    /// A translated table that does not split into 17 entries is ignored in
    /// favor of the built-in one.
    pub fn from_translator(translator: &dyn Translatable) -> Self {
        let table = translator.tr(PREFIXES_CONTEXT, PREFIXES_SOURCE);
        let micro = translator.tr(MICRO_CONTEXT, MICRO_SOURCE);
        let count = table.split(',').count();
        if count != TABLE_LEN {
            warn!("translated SI prefix table has {count} entries, expected {TABLE_LEN}; using built-in");
            return Self::from_table(PREFIXES_SOURCE, &micro);
        }
        Self::from_table(&table, &micro)
    }

    fn from_table(table: &str, micro: &str) -> Self {
        let unicode: Vec<String> = table
            .split(',')
            .map(|p| if p == " " { String::new() } else { p.to_string() })
            .collect();
        let mut ascii = unicode.clone();
        ascii[UNITY - 2] = micro.to_string();
        Self { unicode, ascii }
    }

    /// Prefix for the power-of-1000 `group` (−8 = yocto … 8 = yotta).
    pub fn prefix(&self, group: i32, allow_unicode: bool) -> Option<&str> {
        let index = usize::try_from(group + UNITY as i32).ok()?;
        let table = if allow_unicode { &self.unicode } else { &self.ascii };
        table.get(index).map(String::as_str)
    }

    /// Multiplier and prefix that bring `x` into `[1, 1000)`.
    ///
    /// Magnitudes beyond yocto/yotta get an exponent suffix such as `e27`
    /// instead of a letter. Non-finite values are left alone.
    pub fn scale(&self, x: f64, allow_unicode: bool) -> (f64, String) {
        if !x.is_finite() {
            return (1.0, String::new());
        }
        let group = if x.abs() < MIN_MAGNITUDE {
            0
        } else {
            ((x.abs().log10() / 3.0).floor() as i32).clamp(-9, 9)
        };
        let prefix = match group {
            0 => String::new(),
            g if g.abs() > 8 => format!("e{}", g * 3),
            g => self.prefix(g, allow_unicode).unwrap_or_default().to_string(),
        };
        (10f64.powi(-3 * group), prefix)
    }

    /// `%g`-style rendering with a prefix, e.g. `1.23 kS/s`.
    pub fn format(&self, x: f64, precision: usize, suffix: &str) -> String {
        self.format_with(x, precision, suffix, true)
    }

    pub fn format_with(&self, x: f64, precision: usize, suffix: &str, allow_unicode: bool) -> String {
        let (multiplier, prefix) = self.scale(x, allow_unicode);
        let value = format_g(x * multiplier, precision);
        if prefix.starts_with('e') {
            format!("{value}{prefix}{suffix}")
        } else {
            format!("{value} {prefix}{suffix}")
        }
    }

    /// Fixed-decimals rendering as a spin box shows it, e.g. `2.50 ms`.
    pub fn format_fixed(&self, x: f64, decimals: usize, suffix: &str) -> String {
        self.format_fixed_with(x, decimals, suffix, true)
    }

    pub fn format_fixed_with(
        &self,
        x: f64,
        decimals: usize,
        suffix: &str,
        allow_unicode: bool,
    ) -> String {
        let (multiplier, prefix) = self.scale(x, allow_unicode);
        let value = format!("{:.*}", decimals, x * multiplier);
        if prefix.starts_with('e') || (prefix.is_empty() && suffix.is_empty()) {
            format!("{value}{prefix}{suffix}")
        } else {
            format!("{value} {prefix}{suffix}")
        }
    }

    /// Read a value such as `2.5 ms` or `500мк` back into base units.
    ///
    /// `suffix` is stripped when present. Both the localized and ASCII
    /// prefix letters are accepted, as well as plain exponent notation.
    pub fn parse(&self, text: &str, suffix: &str) -> Result<f64, UnitError> {
        let mut text = text.trim();
        if !suffix.is_empty() {
            text = text.strip_suffix(suffix).unwrap_or(text).trim_end();
        }
        if text.is_empty() {
            return Err(UnitError::Empty);
        }
        if let Ok(value) = text.parse::<f64>() {
            return Ok(value);
        }

        let mut candidates: Vec<(&str, i32)> = self
            .unicode
            .iter()
            .chain(self.ascii.iter())
            .enumerate()
            .filter(|(_, p)| !p.is_empty())
            .map(|(i, p)| (p.as_str(), (i % TABLE_LEN) as i32 - UNITY as i32))
            .collect();
        // "мк" has to win over "м"
        candidates.sort_by_key(|(p, _)| std::cmp::Reverse(p.chars().count()));

        for (prefix, group) in candidates {
            let Some(number) = text.strip_suffix(prefix) else {
                continue;
            };
            if let Ok(value) = number.trim_end().parse::<f64>() {
                return Ok(value * 1000f64.powi(group));
            }
        }
        Err(UnitError::InvalidNumber(text.to_string()))
    }
}
