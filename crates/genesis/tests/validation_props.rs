use l1_genesis::{
    validation::{validate_gas_limit, validate_target_block_rate, MAX_GAS_LIMIT, MIN_GAS_LIMIT},
    recompute, Allocation, GenesisConfigState, Severity,
};
use proptest::prelude::*;

fn valid_state() -> GenesisConfigState {
    let mut s = GenesisConfigState::default();
    s.tokenomics.allocations = vec![Allocation::new(
        "0x8db97C7cEcE249c2b98bDC0226Cc4C2A57BF52FC",
        1.0,
    )];
    s
}

proptest! {
    #[test]
    fn prop_gas_limit_error_iff_out_of_bounds(gas in -1_000_000i64..200_000_000) {
        let d = validate_gas_limit(gas);
        let in_bounds = (MIN_GAS_LIMIT..=MAX_GAS_LIMIT).contains(&gas);
        prop_assert_eq!(d.has_errors(), !in_bounds);
        prop_assert!(d.len() <= 1);
    }

    #[test]
    fn prop_block_rate_severity(rate in -5i64..50) {
        let d = validate_target_block_rate(rate);
        let expected = if rate <= 0 || rate > 30 {
            Some(Severity::Error)
        } else if rate > 10 {
            Some(Severity::Warning)
        } else {
            None
        };
        prop_assert_eq!(d.iter().next().map(|x| x.severity), expected);
    }

    #[test]
    fn prop_document_present_iff_no_errors(
        gas in 0i64..120_000_000,
        rate in -2i64..40,
        amount in prop_oneof![-10.0f64..10.0, 1e50f64..1e70],
    ) {
        let mut s = valid_state();
        s.fees.gas_limit = gas;
        s.fees.target_block_rate = rate;
        s.tokenomics.allocations[0].amount = amount;

        let out = recompute(&s, 0, 0);
        prop_assert_eq!(out.document.is_some(), !out.diagnostics.has_errors());
    }

    #[test]
    fn prop_duplicate_allocations_never_block(
        a in 0.0f64..1e6,
        b in 0.0f64..1e6,
    ) {
        let mut s = valid_state();
        let addr = s.tokenomics.allocations[0].address.to_lowercase();
        s.tokenomics.allocations[0].amount = a;
        s.tokenomics.allocations.push(Allocation::new(addr, b));

        let out = recompute(&s, 0, 0);
        prop_assert!(out.document.is_some());
        prop_assert_eq!(
            out.diagnostics
                .get("tokenomics.allocations[1].address")
                .map(|x| x.severity),
            Some(Severity::Warning)
        );
    }
}
