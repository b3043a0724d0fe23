//! Crypto-conditions: a self-describing format for boolean combinations of
//! cryptographic checks (hash preimages, Ed25519 signatures, weighted
//! thresholds), bit-exact with the Interledger five-bells-condition wire
//! format.
//!
//! This crate is the public facade over the workspace: [`cc_core::Condition`]
//! and [`cc_fulfillment::Fulfillment`] re-exported alongside the three
//! variant builders and [`parse_uri`], the single entry point that
//! dispatches on the `cc:`/`cf:` prefix without the caller needing to know
//! which one they have in hand.

pub use cc_core::{describe_bitmask, Condition, Error, FeatureBit, Result, FEATURE_REGISTRY, VERSION};
pub use cc_fulfillment::{Ed25519, Fulfillment, Preimage, SelectionLimits, Threshold};

/// Either a parsed condition or a parsed fulfillment, returned by
/// [`parse_uri`] once it has inspected the prefix.
#[derive(Debug, Clone)]
pub enum Parsed {
    Condition(Condition),
    Fulfillment(Fulfillment),
}

/// Dispatches a URI to [`Condition::from_uri`] or [`Fulfillment::from_uri`]
/// based on its `cc:`/`cf:` prefix. Any other prefix, or a missing
/// one, fails with `MalformedEncoding`.
pub fn parse_uri(s: &str) -> Result<Parsed> {
    if s.starts_with("cc:") {
        Condition::from_uri(s).map(Parsed::Condition)
    } else if s.starts_with("cf:") {
        Fulfillment::from_uri(s).map(Parsed::Fulfillment)
    } else {
        Err(Error::MalformedEncoding(
            "URI must start with 'cc:' or 'cf:'".into(),
        ))
    }
}

/// Verifies a fulfillment URI against an expected condition supplied
/// out-of-band, the way a caller who already trusts a specific condition
/// (not just whatever the fulfillment claims to derive) checks a witness
/// against it.
///
/// Refuses to parse a fulfillment larger than `condition`'s advertised
/// `max_fulfillment_length` (`FulfillmentTooLarge`, propagated as an
/// error since it is a resource/structural rejection). A fulfillment that
/// parses but derives a *different* condition than expected is not an
/// error — like any other cryptographic mismatch, it simply fails to
/// verify.
pub fn verify(fulfillment_uri: &str, condition: &Condition, message: Option<&[u8]>) -> Result<bool> {
    let fulfillment = Fulfillment::from_uri_bounded(fulfillment_uri, condition.max_fulfillment_length())?;
    if &fulfillment.condition()? != condition {
        return Ok(false);
    }
    Ok(fulfillment.validate(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_condition_and_fulfillment_prefixes() {
        let f = Fulfillment::Preimage(Preimage::new(Vec::new()));
        let condition_uri = f.condition().unwrap().to_uri();
        let fulfillment_uri = f.to_uri().unwrap();

        assert!(matches!(parse_uri(&condition_uri).unwrap(), Parsed::Condition(_)));
        assert!(matches!(parse_uri(&fulfillment_uri).unwrap(), Parsed::Fulfillment(_)));
    }

    #[test]
    fn unknown_prefix_is_malformed() {
        let err = parse_uri("xx:1:0:AA").unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
    }

    #[test]
    fn verify_accepts_matching_condition_and_message() {
        let f = Fulfillment::Preimage(Preimage::new(b"trust root".to_vec()));
        let condition = f.condition().unwrap();
        assert!(verify(&f.to_uri().unwrap(), &condition, None).unwrap());
    }

    #[test]
    fn verify_rejects_condition_mismatch_without_erroring() {
        let f = Fulfillment::Preimage(Preimage::new(b"trust root".to_vec()));
        let other = Fulfillment::Preimage(Preimage::new(b"different".to_vec()))
            .condition()
            .unwrap();
        assert!(!verify(&f.to_uri().unwrap(), &other, None).unwrap());
    }

    #[test]
    fn verify_rejects_fulfillment_exceeding_conditions_bound() {
        let small = Fulfillment::Preimage(Preimage::new(b"x".to_vec()));
        let small_condition = small.condition().unwrap();
        let oversized = Fulfillment::Preimage(Preimage::new(b"much, much longer preimage".to_vec()));

        let err = verify(&oversized.to_uri().unwrap(), &small_condition, None).unwrap_err();
        assert!(matches!(err, Error::FulfillmentTooLarge { .. }));
    }
}
