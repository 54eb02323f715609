use instant::{Duration, Instant};
use morph_view::frame_clock::FrameClock;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn no_rate_before_a_second_has_passed() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    for i in 1..=20 {
        assert_eq!(clock.tick_at(start + ms(i * 25)), None);
    }

    assert_eq!(clock.frame_count(), 20);
    assert_eq!(clock.rate(), None);
}

#[test]
fn rate_is_emitted_when_the_window_closes() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    for i in 1..30 {
        assert_eq!(clock.tick_at(start + ms(i * 33)), None);
    }

    assert_eq!(clock.tick_at(start + ms(1000)), Some(30));
    assert_eq!(clock.frame_count(), 0);
    assert_eq!(clock.rate(), Some(30));
}

#[test]
fn rate_uses_actual_elapsed_time() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    for i in 1..45 {
        assert_eq!(clock.tick_at(start + ms(i * 20)), None);
    }

    assert_eq!(clock.tick_at(start + ms(1500)), Some(30));
}

#[test]
fn window_restarts_after_emitting() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);
    for i in 1..=60 {
        clock.tick_at(start + ms(i * 1000 / 60));
    }
    assert_eq!(clock.rate(), Some(60));

    let second = start + ms(1000);
    assert_eq!(clock.tick_at(second + ms(500)), None);
    assert_eq!(clock.sample_at(second + ms(1500)), Some(1));
}

#[test]
fn sampling_an_idle_clock_reports_zero() {
    let start = Instant::now();
    let mut clock = FrameClock::starting_at(start);

    assert_eq!(clock.sample_at(start + ms(500)), None);
    assert_eq!(clock.sample_at(start + ms(999)), None);
    assert_eq!(clock.sample_at(start + ms(1200)), Some(0));
}
