use cc_codec::{encode_varbytes, encode_varuint, Reader, WriteBuf};
use cc_core::{Condition, Error, Result};

use crate::config::SelectionLimits;
use crate::fulfillment::{dispatch_parse, Fulfillment};
use crate::sha256::sha256;

const FLAG_FULFILLMENT: u8 = 0x80;
const FLAG_HAS_WEIGHT: u8 = 0x40;
const FLAG_HAS_PREFIX: u8 = 0x20;

#[derive(Debug, Clone, PartialEq)]
enum SubBody {
    Fulfillment(Box<Fulfillment>),
    Condition(Condition),
}

#[derive(Debug, Clone, PartialEq)]
struct Subentry {
    weight: u64,
    prefix: Vec<u8>,
    body: SubBody,
}

impl Subentry {
    fn condition(&self) -> Result<Condition> {
        match &self.body {
            SubBody::Fulfillment(f) => f.condition(),
            SubBody::Condition(c) => Ok(c.clone()),
        }
    }
}

/// Threshold-SHA-256: validates iff the summed weight of its validating
/// subentries reaches `threshold`. The only composite variant; subentries
/// are kept in caller insertion order always, since only the fulfilled/bare
/// flag (not position) changes with selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    threshold: u64,
    subentries: Vec<Subentry>,
    limits: SelectionLimits,
}

impl Threshold {
    pub const TYPE_BIT: u64 = 2;
    pub const FEATURE_BIT: u64 = 0x04;

    pub fn new(threshold: u64) -> Self {
        Threshold {
            threshold,
            subentries: Vec::new(),
            limits: SelectionLimits::default(),
        }
    }

    pub fn with_limits(threshold: u64, limits: SelectionLimits) -> Self {
        Threshold {
            threshold,
            subentries: Vec::new(),
            limits,
        }
    }

    pub fn add_fulfillment(mut self, fulfillment: Fulfillment, weight: u64, prefix: impl Into<Vec<u8>>) -> Self {
        self.subentries.push(Subentry {
            weight,
            prefix: prefix.into(),
            body: SubBody::Fulfillment(Box::new(fulfillment)),
        });
        self
    }

    pub fn add_condition(mut self, condition: Condition, weight: u64, prefix: impl Into<Vec<u8>>) -> Self {
        self.subentries.push(Subentry {
            weight,
            prefix: prefix.into(),
            body: SubBody::Condition(condition),
        });
        self
    }

    pub fn type_bit(&self) -> u64 {
        Self::TYPE_BIT
    }

    pub fn feature_bitmask(&self) -> Result<u64> {
        let mut mask = Self::FEATURE_BIT;
        for sub in &self.subentries {
            mask |= sub.condition()?.type_bitmask();
        }
        Ok(mask)
    }

    pub fn hash_fingerprint(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.put_varuint(self.threshold);
        buf.put_varuint(self.subentries.len() as u64);
        for sub in &self.subentries {
            let condition = sub.condition()?;
            buf.put_varuint(sub.weight);
            buf.put_varbytes(&sub.prefix);
            buf.put_fixed(&condition.to_binary());
        }
        Ok(sha256(&buf).to_vec())
    }

    /// Worst-case size of any fulfillment payload that could ever satisfy
    /// this threshold: the subentries most expensive to fulfill are
    /// assumed fulfilled (up to the minimum count needed to meet
    /// `threshold`), everything else assumed bare.
    pub fn calculate_max_fulfillment_length(&self) -> Result<u64> {
        struct Cost {
            fulfilled: u64,
            bare: u64,
            weight: u64,
        }

        let mut costs = Vec::with_capacity(self.subentries.len());
        for sub in &self.subentries {
            let condition = sub.condition()?;
            let weight_overhead = if sub.weight != 1 {
                encode_varuint(sub.weight).len() as u64
            } else {
                0
            };
            let prefix_overhead = if sub.prefix.is_empty() {
                0
            } else {
                encode_varbytes(&sub.prefix).len() as u64
            };
            // +1 for the type_bit VARUINT every fulfillment wrapper carries;
            // type_bit is always < 128 for the defined variants.
            let fulfilled_body = 1 + condition.max_fulfillment_length();
            let bare_body = condition.to_binary().len() as u64;
            costs.push(Cost {
                fulfilled: 1 + weight_overhead + prefix_overhead + fulfilled_body,
                bare: 1 + weight_overhead + prefix_overhead + bare_body,
                weight: sub.weight,
            });
        }

        let mut order: Vec<usize> = (0..costs.len()).collect();
        order.sort_by(|&a, &b| costs[b].fulfilled.cmp(&costs[a].fulfilled));

        let mut chosen = vec![false; costs.len()];
        let mut weight_sum = 0u64;
        for &i in &order {
            if weight_sum >= self.threshold {
                break;
            }
            chosen[i] = true;
            weight_sum += costs[i].weight;
        }

        let total: u64 = costs
            .iter()
            .enumerate()
            .map(|(i, c)| if chosen[i] { c.fulfilled } else { c.bare })
            .sum();

        let wrapper =
            encode_varuint(self.threshold).len() as u64 + encode_varuint(self.subentries.len() as u64).len() as u64;
        Ok(total + wrapper)
    }

    pub fn serialize_payload(&self) -> Result<Vec<u8>> {
        let selected = self.select_subset()?;

        let mut buf = Vec::new();
        buf.put_varuint(self.threshold);
        buf.put_varuint(self.subentries.len() as u64);
        for (i, sub) in self.subentries.iter().enumerate() {
            let use_fulfillment = selected.contains(&i);
            let mut flags = 0u8;
            if sub.weight != 1 {
                flags |= FLAG_HAS_WEIGHT;
            }
            if !sub.prefix.is_empty() {
                flags |= FLAG_HAS_PREFIX;
            }
            if use_fulfillment {
                flags |= FLAG_FULFILLMENT;
            }
            buf.put_fixed(&[flags]);
            if flags & FLAG_HAS_WEIGHT != 0 {
                buf.put_varuint(sub.weight);
            }
            if flags & FLAG_HAS_PREFIX != 0 {
                buf.put_varbytes(&sub.prefix);
            }
            if use_fulfillment {
                let SubBody::Fulfillment(f) = &sub.body else {
                    unreachable!("selection only chooses fulfillment-bearing subentries")
                };
                buf.put_fixed(&f.to_binary()?);
            } else {
                buf.put_fixed(&sub.condition()?.to_binary());
            }
        }
        Ok(buf)
    }

    pub(crate) fn parse_from_reader(r: &mut Reader) -> Result<Self> {
        let threshold = r.read_varuint()?;
        let count = r.read_varuint()?;
        let mut subentries = Vec::with_capacity(count.min(4096) as usize);
        const RESERVED_FLAGS: u8 = !(FLAG_FULFILLMENT | FLAG_HAS_WEIGHT | FLAG_HAS_PREFIX);
        for _ in 0..count {
            let flags = r.read_u8()?;
            if flags & RESERVED_FLAGS != 0 {
                return Err(Error::MalformedEncoding(format!(
                    "threshold subentry flags byte {flags:#04x} sets a reserved bit"
                )));
            }
            let weight = if flags & FLAG_HAS_WEIGHT != 0 { r.read_varuint()? } else { 1 };
            let prefix = if flags & FLAG_HAS_PREFIX != 0 {
                r.read_varbytes()?
            } else {
                Vec::new()
            };
            let body = if flags & FLAG_FULFILLMENT != 0 {
                let type_bit = r.read_varuint()?;
                SubBody::Fulfillment(Box::new(dispatch_parse(type_bit, r)?))
            } else {
                let type_bitmask = r.read_varuint()?;
                let hash = r.read_varbytes()?;
                let max_fulfillment_length = r.read_varuint()?;
                SubBody::Condition(Condition::new(type_bitmask, hash, max_fulfillment_length))
            };
            subentries.push(Subentry { weight, prefix, body });
        }
        Ok(Threshold {
            threshold,
            subentries,
            limits: SelectionLimits::default(),
        })
    }

    /// Validates against an optional message; each fulfillment-bearing
    /// subentry is checked against `prefix || message` for that subentry.
    pub fn validate(&self, message: Option<&[u8]>) -> bool {
        #[cfg(feature = "parallel")]
        if self.subentries.len() >= self.limits.parallel_threshold {
            use rayon::prelude::*;
            let weight_sum: u64 = self
                .subentries
                .par_iter()
                .filter_map(|sub| {
                    let SubBody::Fulfillment(f) = &sub.body else {
                        return None;
                    };
                    let combined = apply_prefix(&sub.prefix, message);
                    f.validate(combined.as_deref()).then_some(sub.weight)
                })
                .sum();
            return weight_sum >= self.threshold;
        }

        let mut weight_sum = 0u64;
        for sub in &self.subentries {
            let SubBody::Fulfillment(f) = &sub.body else {
                continue;
            };
            let combined = apply_prefix(&sub.prefix, message);
            if f.validate(combined.as_deref()) {
                weight_sum += sub.weight;
            }
        }
        weight_sum >= self.threshold
    }

    /// Picks the subset of fulfillment-bearing subentries with minimal
    /// encoded size satisfying the threshold. "Encoded size" is the full
    /// serialized payload this selection would produce: every subentry
    /// contributes its flags/weight/prefix overhead plus either its
    /// fulfilled binary or its bare condition binary, not just the bytes of
    /// the subentries chosen to be fulfilled — leaving a candidate bare
    /// still costs its condition's encoding, and for a short fulfillment
    /// against a hash-sized bare condition that cost can dominate the
    /// comparison. Ties break by subset size, then by lexicographic
    /// comparison of the concatenated fulfilled forms; this tie-break is
    /// part of the wire contract, not an implementation detail, so two
    /// conforming implementations agree byte-for-byte.
    fn select_subset(&self) -> Result<Vec<usize>> {
        let candidates: Vec<usize> = self
            .subentries
            .iter()
            .enumerate()
            .filter_map(|(i, sub)| matches!(sub.body, SubBody::Fulfillment(_)).then_some(i))
            .collect();

        if candidates.len() > self.limits.max_subentries {
            return self.select_subset_greedy(&candidates);
        }

        let mut is_candidate = vec![false; self.subentries.len()];
        for &idx in &candidates {
            is_candidate[idx] = true;
        }

        let mut overhead = Vec::with_capacity(self.subentries.len());
        let mut bare = Vec::with_capacity(self.subentries.len());
        for sub in &self.subentries {
            let weight_overhead = if sub.weight != 1 { encode_varuint(sub.weight).len() } else { 0 };
            let prefix_overhead = if sub.prefix.is_empty() { 0 } else { encode_varbytes(&sub.prefix).len() };
            overhead.push(1 + weight_overhead + prefix_overhead);
            bare.push(sub.condition()?.to_binary());
        }
        let mut fulfilled: Vec<Vec<u8>> = Vec::with_capacity(candidates.len());
        for &idx in &candidates {
            let SubBody::Fulfillment(f) = &self.subentries[idx].body else {
                unreachable!("candidates are filtered to fulfillment-bearing subentries")
            };
            fulfilled.push(f.to_binary()?);
        }

        // Subentries without a fulfillment are always bare, regardless of
        // the mask, so their cost is a constant added to every candidate.
        let constant_bare_total: usize = (0..self.subentries.len())
            .filter(|&i| !is_candidate[i])
            .map(|i| overhead[i] + bare[i].len())
            .sum();

        let n = candidates.len();
        let mut best: Option<(usize, usize, Vec<u8>, Vec<usize>)> = None;
        for mask in 0u32..(1u32 << n) {
            let mut weight_sum = 0u64;
            let mut chosen = Vec::new();
            let mut total = constant_bare_total;
            let mut concatenated = Vec::new();
            for (bit, &idx) in candidates.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    chosen.push(idx);
                    weight_sum += self.subentries[idx].weight;
                    total += overhead[idx] + fulfilled[bit].len();
                    concatenated.extend_from_slice(&fulfilled[bit]);
                } else {
                    total += overhead[idx] + bare[idx].len();
                }
            }
            if weight_sum < self.threshold {
                continue;
            }

            let better = match &best {
                None => true,
                Some((best_total, best_len, best_bytes, _)) => {
                    total < *best_total
                        || (total == *best_total && chosen.len() < *best_len)
                        || (total == *best_total && chosen.len() == *best_len && concatenated < *best_bytes)
                }
            };
            if better {
                best = Some((total, chosen.len(), concatenated, chosen));
            }
        }

        best.map(|(_, _, _, idx)| idx).ok_or(Error::UnsatisfiedThreshold)
    }

    /// Fallback for trees wider than `limits.max_subentries`: sorts
    /// candidates by their own fulfilled encoding size ascending and takes
    /// the smallest ones until the threshold is met. Near-optimal, not
    /// exact; the exhaustive search above is used whenever the tree is
    /// within the configured bound.
    fn select_subset_greedy(&self, candidates: &[usize]) -> Result<Vec<usize>> {
        let mut sized = Vec::with_capacity(candidates.len());
        for &idx in candidates {
            let SubBody::Fulfillment(f) = &self.subentries[idx].body else {
                unreachable!("candidates are filtered to fulfillment-bearing subentries")
            };
            sized.push((idx, f.to_binary()?.len()));
        }
        sized.sort_by_key(|&(_, size)| size);

        let mut weight_sum = 0u64;
        let mut chosen = Vec::new();
        for (idx, _) in sized {
            if weight_sum >= self.threshold {
                break;
            }
            weight_sum += self.subentries[idx].weight;
            chosen.push(idx);
        }
        if weight_sum < self.threshold {
            return Err(Error::UnsatisfiedThreshold);
        }
        Ok(chosen)
    }
}

fn apply_prefix(prefix: &[u8], message: Option<&[u8]>) -> Option<Vec<u8>> {
    if prefix.is_empty() {
        return message.map(|m| m.to_vec());
    }
    let mut combined = prefix.to_vec();
    if let Some(m) = message {
        combined.extend_from_slice(m);
    }
    Some(combined)
}
