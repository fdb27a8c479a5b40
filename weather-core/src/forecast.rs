//! Grouping of 3-hourly forecast samples into calendar days.

use serde::{Deserialize, Serialize};

use crate::{error::WeatherError, format::round_temp, model::ForecastSample};

/// Time of day that marks a day's representative sample.
pub const MIDDAY: &str = "12:00:00";

/// All samples sharing one calendar date, in provider order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    date: String,
    samples: Vec<ForecastSample>,
}

impl DayBucket {
    fn new(first: ForecastSample) -> Self {
        Self { date: first.date().to_string(), samples: vec![first] }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }
}

/// Date-keyed buckets, iterated in the order dates first appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBuckets {
    buckets: Vec<DayBucket>,
}

impl DayBuckets {
    pub fn get(&self, date: &str) -> Option<&DayBucket> {
        self.buckets.iter().find(|b| b.date == date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.date.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn push(&mut self, sample: ForecastSample) {
        match self.buckets.iter_mut().find(|b| b.date == sample.date()) {
            Some(bucket) => bucket.samples.push(sample),
            None => self.buckets.push(DayBucket::new(sample)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    /// The 12:00:00 sample if present, else the first one. Chosen by slot, not
    /// by value, so it may fall outside `min_temp..=max_temp` after rounding.
    pub representative: ForecastSample,
}

/// A labelled time of day used by the hourly timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub label: String,
    pub time: String,
}

impl TimeSlot {
    pub fn new(label: impl Into<String>, time: impl Into<String>) -> Self {
        Self { label: label.into(), time: time.into() }
    }

    /// Morning, Afternoon, Evening, Night.
    pub fn defaults() -> Vec<TimeSlot> {
        vec![
            TimeSlot::new("Morning", "09:00:00"),
            TimeSlot::new("Afternoon", "15:00:00"),
            TimeSlot::new("Evening", "18:00:00"),
            TimeSlot::new("Night", "21:00:00"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSample {
    pub label: String,
    pub sample: ForecastSample,
}

pub fn bucket_by_day<I>(samples: I) -> DayBuckets
where
    I: IntoIterator<Item = ForecastSample>,
{
    let mut buckets = DayBuckets::default();
    for sample in samples {
        buckets.push(sample);
    }
    buckets
}

/// Like [`bucket_by_day`] but rejects an empty sample list.
pub fn bucket_by_day_strict<I>(samples: I) -> Result<DayBuckets, WeatherError>
where
    I: IntoIterator<Item = ForecastSample>,
{
    let buckets = bucket_by_day(samples);
    if buckets.is_empty() {
        return Err(WeatherError::EmptyInput);
    }
    Ok(buckets)
}

/// Dates after `today`, in bucket order, at most `window_size` of them.
pub fn select_upcoming_days(buckets: &DayBuckets, today: &str, window_size: usize) -> Vec<String> {
    buckets
        .dates()
        .filter(|d| *d != today)
        .take(window_size)
        .map(str::to_string)
        .collect()
}

pub fn summarize_day(bucket: &DayBucket) -> DaySummary {
    let samples = bucket.samples();

    let (min_temp, max_temp) = samples.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.temperature), hi.max(s.temperature)),
    );

    let representative = samples
        .iter()
        .find(|s| s.time_of_day() == MIDDAY)
        .unwrap_or(&samples[0])
        .clone();

    DaySummary { date: bucket.date().to_string(), min_temp, max_temp, representative }
}

/// Pick one sample per slot from a single day's samples.
///
/// A slot takes the first sample whose time of day contains the slot's time,
/// so "09:00" matches "09:00:00"; without one it falls back to the day's last
/// sample. With no samples every slot is absent.
pub fn daily_time_slots(samples: &[ForecastSample], slots: &[TimeSlot]) -> Vec<Option<SlotSample>> {
    slots
        .iter()
        .map(|slot| {
            samples
                .iter()
                .find(|s| s.time_of_day().contains(slot.time.as_str()))
                .or_else(|| samples.last())
                .map(|s| SlotSample { label: slot.label.clone(), sample: s.clone() })
        })
        .collect()
}

/// Index of the warmest present slot; the earliest one wins a tie.
///
/// Temperatures are compared as displayed (rounded), so two slots that show
/// the same number count as a tie.
pub fn hottest_slot_index(slots: &[Option<SlotSample>]) -> Option<usize> {
    let mut hottest: Option<(usize, i64)> = None;

    for (idx, slot) in slots.iter().enumerate() {
        let Some(slot) = slot else { continue };
        let temp = round_temp(slot.sample.temperature);
        match hottest {
            Some((_, best)) if temp <= best => {}
            _ => hottest = Some((idx, temp)),
        }
    }

    hottest.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: &str, temp: f64) -> ForecastSample {
        ForecastSample::new(ts, temp, "Clouds")
    }

    fn week() -> Vec<ForecastSample> {
        vec![
            sample("2024-06-01 18:00:00", 30.0),
            sample("2024-06-01 21:00:00", 27.0),
            sample("2024-06-02 09:00:00", 20.0),
            sample("2024-06-02 12:00:00", 26.0),
            sample("2024-06-03 00:00:00", 18.0),
            sample("2024-06-04 00:00:00", 17.0),
            sample("2024-06-05 00:00:00", 16.0),
            sample("2024-06-06 00:00:00", 15.0),
        ]
    }

    #[test]
    fn buckets_keep_every_sample_under_its_date() {
        let input = week();
        let buckets = bucket_by_day(input.clone());

        let dates: Vec<_> = buckets.dates().collect();
        assert_eq!(
            dates,
            ["2024-06-01", "2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05", "2024-06-06"]
        );

        let total: usize = buckets.iter().map(|b| b.samples().len()).sum();
        assert_eq!(total, input.len());

        for bucket in buckets.iter() {
            assert!(!bucket.samples().is_empty());
            assert!(bucket.samples().iter().all(|s| s.date() == bucket.date()));
        }
    }

    #[test]
    fn buckets_preserve_input_order_and_duplicates() {
        let buckets = bucket_by_day(vec![
            sample("2024-06-02 12:00:00", 1.0),
            sample("2024-06-02 09:00:00", 2.0),
            sample("2024-06-02 09:00:00", 3.0),
        ]);

        let temps: Vec<_> = buckets
            .get("2024-06-02")
            .expect("bucket exists")
            .samples()
            .iter()
            .map(|s| s.temperature)
            .collect();
        assert_eq!(temps, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_input_gives_empty_buckets() {
        let buckets = bucket_by_day(Vec::<ForecastSample>::new());
        assert!(buckets.is_empty());
    }

    #[test]
    fn strict_bucketing_rejects_empty_input() {
        assert_eq!(bucket_by_day_strict(Vec::<ForecastSample>::new()), Err(WeatherError::EmptyInput));
        assert_eq!(bucket_by_day_strict(week()).map(|b| b.len()), Ok(6));
    }

    #[test]
    fn upcoming_days_skip_today_and_respect_window() {
        let buckets = bucket_by_day(week());

        let three = select_upcoming_days(&buckets, "2024-06-01", 3);
        assert_eq!(three, ["2024-06-02", "2024-06-03", "2024-06-04"]);

        let five = select_upcoming_days(&buckets, "2024-06-01", 5);
        assert_eq!(five, ["2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05", "2024-06-06"]);
        assert!(five.starts_with(&three));
    }

    #[test]
    fn upcoming_days_never_pad() {
        let buckets = bucket_by_day(vec![sample("2024-06-02 00:00:00", 1.0)]);
        assert_eq!(select_upcoming_days(&buckets, "2024-06-01", 5), ["2024-06-02"]);
        assert!(select_upcoming_days(&buckets, "2024-06-02", 5).is_empty());
    }

    #[test]
    fn upcoming_days_keep_all_dates_when_today_is_absent() {
        let buckets = bucket_by_day(week());
        let days = select_upcoming_days(&buckets, "2030-01-01", 2);
        assert_eq!(days, ["2024-06-01", "2024-06-02"]);
    }

    #[test]
    fn summary_prefers_midday_sample() {
        let buckets = bucket_by_day(vec![
            sample("2024-06-02 09:00:00", 20.0),
            sample("2024-06-02 12:00:00", 26.0),
            sample("2024-06-02 15:00:00", 24.5),
        ]);
        let summary = summarize_day(buckets.get("2024-06-02").expect("bucket exists"));

        assert_eq!(summary.min_temp, 20.0);
        assert_eq!(summary.max_temp, 26.0);
        assert_eq!(summary.representative.timestamp, "2024-06-02 12:00:00");
    }

    #[test]
    fn summary_falls_back_to_first_sample() {
        let buckets = bucket_by_day(vec![
            sample("2024-06-02 15:00:00", 24.0),
            sample("2024-06-02 18:00:00", 21.0),
        ]);
        let summary = summarize_day(buckets.get("2024-06-02").expect("bucket exists"));
        assert_eq!(summary.representative.timestamp, "2024-06-02 15:00:00");
    }

    #[test]
    fn summary_keeps_unrounded_temperatures() {
        let buckets = bucket_by_day(vec![
            sample("2024-06-02 09:00:00", 19.6),
            sample("2024-06-02 12:00:00", 25.4),
        ]);
        let summary = summarize_day(buckets.get("2024-06-02").expect("bucket exists"));
        assert_eq!(summary.min_temp, 19.6);
        assert_eq!(summary.max_temp, 25.4);
    }

    #[test]
    fn single_sample_summary_has_equal_bounds() {
        let buckets = bucket_by_day(vec![sample("2024-06-03 03:00:00", 18.0)]);
        let summary = summarize_day(buckets.get("2024-06-03").expect("bucket exists"));

        assert_eq!(summary.min_temp, 18.0);
        assert_eq!(summary.max_temp, 18.0);
        assert_eq!(summary.representative.timestamp, "2024-06-03 03:00:00");
    }

    #[test]
    fn time_slots_match_exact_time_or_fall_back_to_last() {
        let today = vec![
            sample("2024-06-01 09:00:00", 22.0),
            sample("2024-06-01 15:00:00", 31.0),
            sample("2024-06-01 21:00:00", 25.0),
        ];
        let slots = daily_time_slots(&today, &TimeSlot::defaults());

        let picked: Vec<_> = slots
            .iter()
            .map(|s| s.as_ref().map(|s| (s.label.as_str(), s.sample.timestamp.as_str())))
            .collect();

        assert_eq!(
            picked,
            [
                Some(("Morning", "2024-06-01 09:00:00")),
                Some(("Afternoon", "2024-06-01 15:00:00")),
                Some(("Evening", "2024-06-01 21:00:00")),
                Some(("Night", "2024-06-01 21:00:00")),
            ]
        );
    }

    #[test]
    fn time_slots_accept_short_configured_times() {
        let today = vec![sample("2024-06-01 09:00:00", 22.0), sample("2024-06-01 21:00:00", 10.0)];
        let slots = daily_time_slots(&today, &[TimeSlot::new("Morning", "09:00")]);

        let picked = slots[0].as_ref().expect("slot present");
        assert_eq!(picked.sample.timestamp, "2024-06-01 09:00:00");
        assert_eq!(picked.sample.temperature, 22.0);
    }

    #[test]
    fn time_slots_are_absent_without_samples() {
        let slots = daily_time_slots(&[], &TimeSlot::defaults());
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(Option::is_none));
    }

    #[test]
    fn hottest_slot_prefers_first_on_tie() {
        let today = vec![
            sample("2024-06-01 09:00:00", 22.0),
            sample("2024-06-01 15:00:00", 31.0),
            sample("2024-06-01 18:00:00", 30.8),
            sample("2024-06-01 21:00:00", 25.0),
        ];
        let slots = daily_time_slots(&today, &TimeSlot::defaults());
        assert_eq!(hottest_slot_index(&slots), Some(1));
    }

    #[test]
    fn hottest_slot_skips_absent_entries() {
        let present = SlotSample { label: "Night".into(), sample: sample("2024-06-01 21:00:00", 10.0) };
        let slots = vec![None, None, Some(present)];
        assert_eq!(hottest_slot_index(&slots), Some(2));
        assert_eq!(hottest_slot_index(&[None, None]), None);
    }

    #[test]
    fn end_to_end_forecast_window() {
        let input = vec![
            sample("2024-06-02 09:00:00", 20.0),
            sample("2024-06-02 12:00:00", 26.0),
            sample("2024-06-03 00:00:00", 18.0),
        ];
        let buckets = bucket_by_day(input);
        let days = select_upcoming_days(&buckets, "2024-06-01", 3);
        assert_eq!(days, ["2024-06-02", "2024-06-03"]);

        let first = summarize_day(buckets.get(&days[0]).expect("bucket exists"));
        assert_eq!((first.min_temp, first.max_temp), (20.0, 26.0));
        assert_eq!(first.representative.time_of_day(), "12:00:00");

        let second = summarize_day(buckets.get(&days[1]).expect("bucket exists"));
        assert_eq!((second.min_temp, second.max_temp), (18.0, 18.0));
        assert_eq!(second.representative.timestamp, "2024-06-03 00:00:00");
    }
}
