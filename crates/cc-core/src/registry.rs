//! The version-1 feature bitmask registry. Kept as a single lazily
//! built lookup table so diagnostic rendering (condition summaries, CLI
//! output) never has to re-derive the bit-to-name mapping by hand.

use lazy_static::lazy_static;

/// One entry in the feature bitmask registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBit {
    pub bit: u32,
    pub name: &'static str,
    pub implemented: bool,
}

lazy_static! {
    pub static ref FEATURE_REGISTRY: Vec<FeatureBit> = vec![
        FeatureBit { bit: 0x01, name: "preimage-sha-256", implemented: true },
        FeatureBit { bit: 0x02, name: "rsa-sha-256", implemented: false },
        FeatureBit { bit: 0x04, name: "threshold-sha-256", implemented: true },
        FeatureBit { bit: 0x08, name: "prefix-sha-256", implemented: false },
        FeatureBit { bit: 0x20, name: "ed25519-sha-256", implemented: true },
    ];
}

/// Renders a type bitmask as a `+`-joined list of feature names, e.g.
/// `"preimage-sha-256+ed25519-sha-256"`. Bits with no registry entry are
/// rendered as `bit-0x.. ` so the output stays total over any `u32`.
pub fn describe_bitmask(mask: u32) -> String {
    let mut names: Vec<String> = FEATURE_REGISTRY
        .iter()
        .filter(|f| mask & f.bit != 0)
        .map(|f| f.name.to_string())
        .collect();

    let known_bits: u32 = FEATURE_REGISTRY.iter().fold(0, |acc, f| acc | f.bit);
    let unknown = mask & !known_bits;
    for shift in 0..32 {
        let bit = 1u32 << shift;
        if unknown & bit != 0 {
            names.push(format!("bit-{bit:#04x}"));
        }
    }
    names.join("+")
}
