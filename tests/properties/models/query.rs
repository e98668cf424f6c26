use crate::properties::strategies::{invalid_wallet_strategy, raw_params_strategy, wallet_strategy};

use proptest::{option, prelude::*, test_runner::Config};
use wallet_history::{
	models::{is_wallet_address, RawTransactionParams, TransactionQuery},
	utils::constants::MAX_PAGE_LIMIT,
};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_valid_params_are_accepted_and_normalized(
		params in wallet_strategy().prop_flat_map(raw_params_strategy)
	) {
		let inverted = matches!(
			(params.from_block.as_deref(), params.to_block.as_deref()),
			(Some(from), Some(to)) if from.parse::<u64>().unwrap() > to.parse::<u64>().unwrap()
		);
		let wallet = params.wallet.clone().unwrap();

		match params.validate("ethereum") {
			Ok(query) => {
				prop_assert!(!inverted);
				prop_assert_eq!(query.wallet_lowercase(), wallet.to_lowercase());
				prop_assert_eq!(query.network.trim(), query.network.as_str());
				prop_assert_eq!(query.network.to_lowercase(), query.network.clone());
			}
			Err(errors) => {
				prop_assert!(inverted);
				prop_assert!(errors.has_field("toBlock"));
				prop_assert_eq!(errors.field_errors.len(), 1);
			}
		}
	}

	#[test]
	fn test_malformed_wallets_are_rejected(wallet in invalid_wallet_strategy()) {
		prop_assert!(!is_wallet_address(&wallet));

		let errors = TransactionQuery::try_from(RawTransactionParams {
			wallet: Some(wallet),
			..Default::default()
		})
		.unwrap_err();

		prop_assert!(errors.has_field("wallet"));
	}

	#[test]
	fn test_limit_bounds(wallet in wallet_strategy(), limit in -1_000i64..1_000) {
		let result = TransactionQuery::try_from(RawTransactionParams {
			wallet: Some(wallet),
			limit: Some(limit.to_string()),
			..Default::default()
		});

		let in_range = (1..=MAX_PAGE_LIMIT as i64).contains(&limit);
		prop_assert_eq!(result.is_ok(), in_range);
		if let Ok(query) = result {
			prop_assert_eq!(query.limit, Some(limit as u16));
		}
	}

	#[test]
	fn test_accepted_queries_hold_invariants(
		wallet in option::of(".{0,50}"),
		network in option::of(".{0,12}"),
		from_block in option::of(".{0,12}"),
		to_block in option::of(".{0,12}"),
		limit in option::of(".{0,5}"),
		page_cursor in option::of(".{0,8}"),
	) {
		let raw = RawTransactionParams {
			wallet,
			network,
			from_block,
			to_block,
			limit,
			page_cursor,
		};

		if let Ok(query) = raw.validate("ethereum") {
			if let (Some(from), Some(to)) = (query.from_block, query.to_block) {
				prop_assert!(from <= to);
			}
			if let Some(limit) = query.limit {
				prop_assert!((1..=MAX_PAGE_LIMIT).contains(&limit));
			}
			prop_assert!(!query.network.is_empty());
		}
	}
}
