#![no_main]

use libfuzzer_sys::fuzz_target;
use wallet_history::models::RawTransactionParams;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let mut fields = input.split('&').map(|part| part.to_string());

    let params = RawTransactionParams {
        wallet: fields.next(),
        network: fields.next(),
        from_block: fields.next(),
        to_block: fields.next(),
        limit: fields.next(),
        page_cursor: fields.next(),
    };

    if let Ok(query) = params.validate("ethereum") {
        if let (Some(from), Some(to)) = (query.from_block, query.to_block) {
            assert!(from <= to);
        }
    }
});
