//! Loading a sealed configuration from JSON.
#![cfg(feature = "serde")]

use evmledger::{ConfigError, EvmConfig};
use primitives::{SpecId, U256};

const CONFIG: &str = r#"{
    "chain": {
        "chainId": 9000,
        "homesteadBlock": 0,
        "eip155Block": 0,
        "istanbulBlock": 0,
        "berlinBlock": 0,
        "londonBlock": 100,
        "shanghaiTime": 1700000000,
        "cancunTime": null,
        "pragueTime": null
    },
    "feeMarket": {
        "noBaseFee": false,
        "baseFeeChangeDenominator": 8,
        "elasticityMultiplier": 2,
        "enableHeight": 100,
        "baseFee": "0x3b9aca00",
        "minGasPrice": "0x0"
    },
    "coinInfo": {
        "denom": "uatom",
        "extendedDenom": "aatom",
        "displayDenom": "atom",
        "decimals": 6
    }
}"#;

#[test]
fn loads_and_seals() -> anyhow::Result<()> {
    let config = EvmConfig::from_json(CONFIG)?;

    assert_eq!(config.chain.chain_id, 9000);
    assert_eq!(config.spec_id(99, 0), SpecId::BERLIN);
    assert_eq!(config.spec_id(100, 0), SpecId::LONDON);
    assert_eq!(config.spec_id(200, 1_700_000_000), SpecId::SHANGHAI);
    assert_eq!(config.coin_info.extended_denom(), "aatom");
    assert_eq!(config.fee_market.base_fee, U256::from(1_000_000_000u64));
    assert_eq!(config.base_fee(99, 0, None), None);
    Ok(())
}

#[test]
fn round_trips_through_json() -> anyhow::Result<()> {
    let config = EvmConfig::from_json(CONFIG)?;
    let json = serde_json::to_string(&*config)?;
    assert_eq!(EvmConfig::from_json(&json)?, config);
    Ok(())
}

#[test]
fn rejects_out_of_range_decimals() {
    let json = CONFIG.replace("\"decimals\": 6", "\"decimals\": 19");
    assert!(matches!(
        EvmConfig::from_json(&json),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn rejects_mismatched_extended_denom() {
    let json = CONFIG.replace("\"decimals\": 6", "\"decimals\": 18");
    assert!(matches!(
        EvmConfig::from_json(&json),
        Err(ConfigError::CoinInfo(_))
    ));
}
