/// Decide whether the screen should be on under the inactivity policy.
///
/// A running stopwatch keeps the screen on; otherwise it goes dark once
/// the idle time reaches the timeout.
pub fn screen_should_be_on(
    stopwatch_running: bool,
    auto_off_enabled: bool,
    idle_secs: u64,
    auto_off_timeout_secs: u64,
) -> bool {
    if stopwatch_running {
        return true;
    }

    if auto_off_enabled && idle_secs >= auto_off_timeout_secs {
        return false;
    }

    true
}
