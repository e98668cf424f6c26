#![no_main]

use libfuzzer_sys::fuzz_target;
use wallet_history::{models::QueryResponse, utils::parse_quantity};

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<QueryResponse>(data) {
        for tx in &response.data.transactions {
            let _ = tx.value_decimal();
        }
    }
    let _ = parse_quantity(&String::from_utf8_lossy(data));
});
