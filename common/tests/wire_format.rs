use tickets_common::{
    contract::ScValue,
    crypto::{Address, ContractId},
    network::Network,
    serializer::{ReaderError, Serializer},
    transaction::{InvokeContractOperation, TimeBounds, UnsignedTransaction},
};

const CALLER: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
const CONTRACT: &str = "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC";

// purchase_ticket(CALLER, 7) at sequence 42, valid until 2025-01-01T00:00:30Z
const PURCHASE_HEX: &str = concat!(
    "00",
    "4741415a4934544352335459354f4a4843544a4332413451535936434a574a483549414a54474b494e324552374c424e564b4f4343574e37",
    "00000064",
    "000000000000002a",
    "0000000000000000",
    "000000006774859e",
    "01",
    "43444c5a46433353594a59445a54374b3637565a373548504a56494555564e49584634375a4732464232524d515156553248484743595343",
    "000f70757263686173655f7469636b6574",
    "0002",
    "1200",
    "4741415a4934544352335459354f4a4843544a4332413451535936434a574a483549414a54474b494e324552374c424e564b4f4343574e37",
    "0300000007",
    "0000",
    "00",
);

const PURCHASE_TESTNET_HASH: &str =
    "5aaf3f12ab7fb0d5bb8a9cbd6d8a706a914e81b704937f04985c9c589144794b";

fn purchase() -> UnsignedTransaction {
    let caller = Address::new(CALLER).unwrap();
    UnsignedTransaction::new(
        caller.clone(),
        100,
        42,
        TimeBounds::new(0, 1_735_689_630),
        InvokeContractOperation::new(
            ContractId::new(CONTRACT).unwrap(),
            "purchase_ticket".to_owned(),
            vec![ScValue::Address(caller), ScValue::U32(7)],
        ),
    )
}

#[test]
fn test_unsigned_transaction_vector() {
    let tx = purchase();
    assert_eq!(tx.to_hex(), PURCHASE_HEX);
    assert_eq!(tx.size(), PURCHASE_HEX.len() / 2);
    assert_eq!(UnsignedTransaction::from_hex(PURCHASE_HEX).unwrap(), tx);
}

#[test]
fn test_transaction_hash_vector() {
    let tx = purchase();
    assert_eq!(tx.hash(&Network::Testnet).to_hex(), PURCHASE_TESTNET_HASH);
    assert_ne!(tx.hash(&Network::Mainnet), tx.hash(&Network::Testnet));
}

#[test]
fn test_rejected_encodings() {
    // Trailing byte
    let hex = format!("{}00", PURCHASE_HEX);
    assert!(matches!(
        UnsignedTransaction::from_hex(&hex),
        Err(ReaderError::InvalidSize)
    ));

    // Truncated
    assert!(UnsignedTransaction::from_hex(&PURCHASE_HEX[..PURCHASE_HEX.len() - 2]).is_err());

    // Open ended validity window
    let hex = PURCHASE_HEX.replacen("000000006774859e", "0000000000000000", 1);
    assert!(UnsignedTransaction::from_hex(&hex).is_err());

    assert!(matches!(
        UnsignedTransaction::from_hex("zz"),
        Err(ReaderError::InvalidHex)
    ));
}
