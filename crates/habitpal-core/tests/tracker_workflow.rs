//! End-to-end workflow over an on-disk store.
//!
//! Covers the path a user takes through the app: create a profile, add
//! habits, complete them across several days, talk to the partner, and read
//! the weekly review back from a reopened store.

use chrono::{Days, NaiveDate};
use habitpal_core::partner::ReviewBand;
use habitpal_core::{
    CheckIn, Config, Frequency, Habit, HabitStats, MessageKind, NotificationKind, Partner, Priority,
    Store, Tracker,
};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

#[test]
fn week_of_habits_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitpal.db");
    let mut rng = Pcg64::seed_from_u64(11);

    let (read_id, run_id) = {
        let store = Store::open_at(&path).unwrap();
        let tracker = Tracker::new(&store, &Config::default());
        tracker.init_user("Robin").unwrap();
        let read = tracker
            .add_habit(Habit::new("Read", "learning", Frequency::Daily, day(1)).with_priority(Priority::Medium))
            .unwrap();
        let run = tracker
            .add_habit(Habit::new("Run", "health", Frequency::Daily, day(1)))
            .unwrap();

        for d in 1..=7 {
            tracker.complete(&read.id, day(d)).unwrap();
        }
        for d in [2, 4, 6] {
            tracker.complete(&run.id, day(d)).unwrap();
        }
        (read.id, run.id)
    };

    let store = Store::open_at(&path).unwrap();
    let tracker = Tracker::with_defaults(&store);

    let read = tracker.find_habit(&read_id).unwrap();
    assert_eq!(read.streak_count, 7);
    assert_eq!(read.longest_streak, 7);
    assert_eq!(tracker.find_habit(&run_id).unwrap().completed_dates.len(), 3);

    // Read: 6 days of 13 plus a 7-day milestone day of 10+3+5+14.
    // Run: 3 days of 10. Both done on days 2, 4 and 6: three daily bonuses.
    let expected = 6 * 13 + 32 + 3 * 10 + 3 * 15;
    let user = tracker.user().unwrap();
    assert_eq!(user.virtual_currency, expected);
    assert_eq!(user.streak_count, 7);

    let inbox = store.notifications().unwrap();
    let achievements = inbox
        .items()
        .iter()
        .filter(|n| n.kind == NotificationKind::Achievement)
        .count();
    assert_eq!(achievements, 4);

    let review = tracker.weekly_review(day(7)).unwrap();
    assert_eq!(review.completed, 10);
    assert_eq!(review.total, 10);
    assert_eq!(review.band(), ReviewBand::Excellent);
    assert_eq!(review.top_streak.as_ref().unwrap().title, "Read");

    let reply = tracker.send_message("so tired today", day(7), &mut rng).unwrap();
    assert_eq!(reply.kind, Some(MessageKind::Encouragement));
    assert!(reply.content.contains("7-day streak"));

    let stats = HabitStats::compute(&tracker.habits().unwrap(), day(7));
    assert_eq!(stats.completed_today, 1);
    assert_eq!(stats.total_completions, 10);
}

#[test]
fn tired_message_mentions_streak_value() {
    let mut habit = Habit::new("Meditate", "", Frequency::Daily, day(1));
    habit.streak_count = 10;
    habit.longest_streak = 10;
    let partner = Partner::new();
    let mut rng = Pcg64::seed_from_u64(3);
    let msg = partner.respond("I'm so tired today", &[habit], day(10), &mut rng);
    assert_eq!(msg.kind, Some(MessageKind::Encouragement));
    assert!(msg.content.contains("10"));
}

#[test]
fn review_without_check_ins_is_fallback_text() {
    let partner = Partner::new();
    let habit = Habit::new("Read", "", Frequency::Daily, day(1));
    let stale = CheckIn::completed(habit.id.clone(), day(1));
    let today = day(1).checked_add_days(Days::new(30)).unwrap();

    let review = partner.weekly_review(&[habit], &[stale], today);
    assert!(!review.has_check_ins());
    let text = review.render();
    assert!(!text.is_empty());
    assert_eq!(review.to_message().kind, Some(MessageKind::Feedback));
}
