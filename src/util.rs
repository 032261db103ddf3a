use std::time::Duration;

pub(crate) fn retriable_status(code: u16) -> bool {
    matches!(code, 500 | 502 | 503 | 504 | 429 | 408)
}

pub(crate) fn backoff(current: Duration, max: Duration) -> Duration {
    let next = Duration::from_secs_f64((current.as_secs_f64() * 1.5).max(1.0));
    if next > max { max } else { next }
}

/// Everything before `?`; the query carries the API key and must stay out of messages.
pub(crate) fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Outcome of one attempt, as seen by [`attempt_loop`].
pub(crate) enum Attempt<T, E> {
    Done(T),
    /// Worth another try; carries what to return if attempts run out.
    Retry(std::result::Result<T, E>),
    Fail(E),
}

/// Runs `f` up to `max_attempts` times (at least once), sleeping with growing backoff
/// between retriable attempts.
pub(crate) fn attempt_loop<T, E, F, S>(
    max_attempts: usize,
    sleep_max: Duration,
    mut sleep: S,
    mut f: F,
) -> std::result::Result<T, E>
where
    F: FnMut(usize) -> Attempt<T, E>,
    S: FnMut(Duration),
{
    let max_attempts = max_attempts.max(1);
    let mut delay = Duration::ZERO;
    let mut tries = 0usize;
    loop {
        tries += 1;
        match f(tries) {
            Attempt::Done(v) => return Ok(v),
            Attempt::Fail(e) => return Err(e),
            Attempt::Retry(last) => {
                if tries >= max_attempts {
                    return last;
                }
                delay = backoff(delay, sleep_max);
                sleep(delay);
            }
        }
    }
}
