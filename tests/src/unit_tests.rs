//! Signing, nonce and candle properties

use bfx_core::prelude::*;
use bfx_exchanges::bitfinex::auth::decode_payload;
use bfx_exchanges::bitfinex::candle::{aggregate, CandleWindow};
use bfx_exchanges::prelude::*;
use proptest::prelude::*;
use rstest::*;
use serde_json::json;

fn new_signer() -> RequestSigner {
    RequestSigner::new(Credentials::new("test-api-key", "test-secret-key")).unwrap()
}

#[fixture]
fn signer() -> RequestSigner {
    new_signer()
}

fn trade(price: f64, amount: f64, side: OrderSide, timestamp: i64) -> Trade {
    Trade {
        tid: None,
        price,
        amount,
        side,
        timestamp,
    }
}

// ============================================================================
// REQUEST SIGNING
// ============================================================================

#[cfg(test)]
mod signing {
    use super::*;

    #[rstest]
    #[case("/v1/balances", json!({}))]
    #[case("/v1/order/status", json!({"order_id": 448411153}))]
    #[case("/v1/order/new", json!({"symbol": "btcusd", "amount": "0.01", "price": "250", "side": "buy", "type": "exchange limit"}))]
    fn test_signature_is_deterministic(signer: RequestSigner, #[case] request: &str, #[case] params: serde_json::Value) {
        let first = signer.sign_with_nonce(request, &params, 1_444_272_165_000).unwrap();
        let second = signer.sign_with_nonce(request, &params, 1_444_272_165_000).unwrap();

        assert_eq!(first, second);
        assert!(signer.verify(&first.payload, &first.signature));
    }

    #[rstest]
    fn test_other_secret_other_signature(signer: RequestSigner) {
        let other = RequestSigner::new(Credentials::new("test-api-key", "test-secret-kez")).unwrap();
        let a = signer.sign_with_nonce("/v1/orders", &(), 1).unwrap();
        let b = other.sign_with_nonce("/v1/orders", &(), 1).unwrap();

        assert_eq!(a.payload, b.payload);
        assert_ne!(a.signature, b.signature);
    }

    #[rstest]
    fn test_payload_carries_request_and_nonce(signer: RequestSigner) {
        let headers = signer
            .sign_with_nonce("/v1/mytrades", &json!({"symbol": "btcusd"}), 42)
            .unwrap();
        let payload = decode_payload(&headers.payload).unwrap();

        assert_eq!(payload, json!({"nonce": "42", "request": "/v1/mytrades", "symbol": "btcusd"}));
        assert_eq!(headers.api_key, "test-api-key");
    }

    #[rstest]
    fn test_nonces_increase_within_one_millisecond(signer: RequestSigner) {
        let nonces: Vec<u64> = (0..200)
            .map(|_| {
                let headers = signer.sign("/v1/orders", &()).unwrap();
                decode_payload(&headers.payload).unwrap()["nonce"]
                    .as_str()
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect();

        assert!(nonces.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_nonce_floor_carries_over() {
        let floor = unix_millis() + 60_000;
        let signer = RequestSigner::with_nonces(
            Credentials::new("k", "s"),
            NonceGenerator::with_floor(floor),
        )
        .unwrap();

        let headers = signer.sign("/v1/orders", &()).unwrap();
        let nonce: u64 = decode_payload(&headers.payload).unwrap()["nonce"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(nonce > floor);
    }

    proptest! {
        #[test]
        fn prop_single_byte_change_changes_signature(
            symbol in "[a-z]{6}",
            index in 0usize..6,
            replacement in b'a'..=b'z',
        ) {
            let signer = new_signer();
            let mut bytes = symbol.clone().into_bytes();
            prop_assume!(bytes[index] != replacement);
            bytes[index] = replacement;
            let altered = String::from_utf8(bytes).unwrap();

            let a = signer.sign_with_nonce("/v1/mytrades", &json!({"symbol": symbol}), 7).unwrap();
            let b = signer.sign_with_nonce("/v1/mytrades", &json!({"symbol": altered}), 7).unwrap();
            prop_assert_ne!(a.signature, b.signature);
        }

        #[test]
        fn prop_nonce_change_changes_signature(nonce in 1u64..u64::MAX) {
            let signer = new_signer();
            let a = signer.sign_with_nonce("/v1/balances", &(), nonce).unwrap();
            let b = signer.sign_with_nonce("/v1/balances", &(), nonce - 1).unwrap();
            prop_assert_ne!(a.signature, b.signature);
        }
    }
}

// ============================================================================
// CANDLE AGGREGATION
// ============================================================================

#[cfg(test)]
mod candles {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn window_at(t0: i64, minutes: u32) -> CandleWindow {
        CandleWindow::ending_at(Timestamp::from_secs_f64(t0 as f64), minutes)
    }

    #[test]
    fn test_newest_first_tape() {
        let tape = vec![
            trade(10.0, 1.0, OrderSide::Buy, T0),
            trade(12.0, 1.0, OrderSide::Sell, T0 - 5),
            trade(9.0, 1.0, OrderSide::Buy, T0 - 10),
        ];
        let candle = aggregate(&tape, &window_at(T0, 1), Timestamp::now()).unwrap();

        assert_eq!(candle.open, 10.0);
        assert_eq!(candle.close, 9.0);
        assert_eq!(candle.low, 9.0);
        assert_eq!(candle.high, 12.0);
    }

    #[rstest]
    #[case(1, 61)]
    #[case(1, 3600)]
    #[case(5, 301)]
    fn test_all_trades_outside_window(#[case] minutes: u32, #[case] age: i64) {
        let tape = vec![
            trade(10.0, 1.0, OrderSide::Buy, T0 - age),
            trade(11.0, 2.0, OrderSide::Sell, T0 - age - 30),
        ];
        assert_eq!(aggregate(&tape, &window_at(T0, minutes), Timestamp::now()), None);
    }

    #[test]
    fn test_generated_at_is_passed_through() {
        let tape = vec![trade(10.0, 1.0, OrderSide::Buy, T0)];
        let at = Timestamp::from_nanos(1_234);
        let candle = aggregate(&tape, &window_at(T0, 1), at).unwrap();
        assert_eq!(candle.generated_at, at);
    }

    fn arb_tape() -> impl Strategy<Value = Vec<Trade>> {
        prop::collection::vec(
            (1.0f64..100_000.0, 0.0001f64..50.0, any::<bool>(), 0i64..120),
            0..60,
        )
        .prop_map(|rows| {
            let mut tape: Vec<Trade> = rows
                .into_iter()
                .map(|(price, amount, buy, age)| {
                    let side = if buy { OrderSide::Buy } else { OrderSide::Sell };
                    trade(price, amount, side, T0 - age)
                })
                .collect();
            tape.sort_by_key(|t| std::cmp::Reverse(t.timestamp));
            tape
        })
    }

    proptest! {
        #[test]
        fn prop_candle_is_consistent(tape in arb_tape()) {
            let window = window_at(T0, 1);
            let included: Vec<&Trade> = tape.iter().filter(|t| window.contains(t)).collect();

            match aggregate(&tape, &window, Timestamp::now()) {
                None => prop_assert!(included.is_empty()),
                Some(candle) => {
                    prop_assert_eq!(candle.open, included[0].price);
                    prop_assert_eq!(candle.close, included[included.len() - 1].price);
                    prop_assert!(candle.low <= candle.open && candle.open <= candle.high);
                    prop_assert!(candle.low <= candle.close && candle.close <= candle.high);

                    let volume: f64 = included.iter().map(|t| t.amount).sum();
                    prop_assert!((candle.volume - volume).abs() < 1e-6);
                    prop_assert!((candle.buy_volume + candle.sell_volume - candle.volume).abs() < 1e-6);
                }
            }
        }
    }
}
