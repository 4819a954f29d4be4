//! Gather several independent service calls without letting one failure
//! sink the rest.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;

use nasa_explorer_lib::Result;

use crate::metrics::record_fanout_subcall;

/// Run `call` once per key concurrently and return every outcome, paired
/// with its key, in input order.
///
/// Failures are logged at `warn` with the key and counted under `route`;
/// they never short-circuit sibling calls.
pub async fn settle_all<K, T, F, Fut>(
    route: &'static str,
    keys: impl IntoIterator<Item = K>,
    call: F,
) -> Vec<(K, Result<T>)>
where
    K: Clone + Display,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let keys: Vec<K> = keys.into_iter().collect();
    let outcomes = join_all(keys.iter().cloned().map(call)).await;

    keys.into_iter()
        .zip(outcomes)
        .inspect(|(key, outcome)| match outcome {
            Ok(_) => record_fanout_subcall(route, "ok"),
            Err(error) => {
                tracing::warn!(route, key = %key, error = %error, "fan-out sub-call failed");
                record_fanout_subcall(route, "error");
            }
        })
        .collect()
}
