//! Async adapters between encoders, decoders and part streams.
//!
//! Animated QR displays emit parts at a fixed frame rate; [`paced_parts`]
//! throttles an encoder with a token bucket so consumers see the same
//! cadence. [`decode_stream`] drives a decoder from any stream of textual
//! parts until it succeeds, fails or the stream ends.

use std::{num::NonZeroUsize, pin::pin, time::Duration};

use futures::{Stream, StreamExt, stream};
use leaky_bucket::RateLimiter;
use log::debug;

use crate::{
    bytewords::WordCodec,
    decoder::UrDecoder,
    encoder::UrEncoder,
    error::{Error, Result},
    ur::Ur,
};

/// Emit `encoder`'s parts indefinitely, at most `parts_per_second` each
/// second.
///
/// The first second's allowance is available immediately. Each item is the
/// result of [`UrEncoder::next_part`].
pub fn paced_parts<C: WordCodec>(
    encoder: UrEncoder<C>,
    parts_per_second: NonZeroUsize,
) -> impl Stream<Item = Result<String>> {
    let rate = parts_per_second.get();
    let limiter = RateLimiter::builder()
        .initial(rate)
        .refill(rate)
        .interval(Duration::from_secs(1))
        .max(rate)
        .build();

    stream::unfold((encoder, limiter), |(mut encoder, limiter)| async move {
        limiter.acquire(1).await;
        let part = encoder.next_part();
        Some((part, (encoder, limiter)))
    })
}

/// Feed `parts` to `decoder` until it completes.
///
/// Tolerated per-part errors are skipped; the decoder has already counted
/// and logged them.
///
/// # Errors
///
/// Returns the decoder's fatal error if the session fails, or
/// [`Error::Incomplete`] if `parts` ends before the UR is recovered.
pub async fn decode_stream<C, S>(decoder: &mut UrDecoder<C>, parts: S) -> Result<Ur>
where
    C: WordCodec,
    S: Stream<Item = String>,
{
    let mut parts = pin!(parts);
    while !decoder.is_complete() {
        let Some(text) = parts.next().await else {
            debug!(
                "part stream ended after {} parts",
                decoder.processed_parts_count()
            );
            return Err(Error::Incomplete {
                processed: decoder.processed_parts_count(),
            });
        };
        if let Err(err) = decoder.receive_part(&text) {
            if err.is_fatal() {
                return Err(err);
            }
        }
    }

    match (decoder.result_ur(), decoder.result_error()) {
        (Some(ur), _) => Ok(ur.clone()),
        (None, Some(err)) => Err(err.clone()),
        (None, None) => Err(Error::Incomplete {
            processed: decoder.processed_parts_count(),
        }),
    }
}
