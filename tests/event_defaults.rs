// Integration tests for event synthesis and the end-time defaults.
use chrono::{NaiveDate, TimeZone, Utc};
use m21cal::model::{DateRange, EventBuilder, EventDate, LinkCollector};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn builder() -> EventBuilder {
    EventBuilder::new(0, Utc.with_ymd_and_hms(2014, 2, 1, 8, 0, 0).unwrap())
}

#[test]
fn test_all_day_without_end_lasts_one_day() {
    let range = DateRange {
        start: EventDate::AllDay(ymd(2014, 3, 5)),
        end: None,
    };
    let e = builder()
        .build(Some(range), None, Some("Clubabend"), &LinkCollector::new())
        .unwrap();
    assert_eq!(e.start, EventDate::AllDay(ymd(2014, 3, 5)));
    assert_eq!(e.end, EventDate::AllDay(ymd(2014, 3, 6)));
}

#[test]
fn test_timed_without_end_lasts_two_hours() {
    let start = ymd(2014, 3, 5).and_hms_opt(19, 0, 0).unwrap();
    let range = DateRange {
        start: EventDate::Specific(start),
        end: None,
    };
    let e = builder()
        .build(Some(range), None, Some("Clubabend"), &LinkCollector::new())
        .unwrap();
    assert_eq!(
        e.end,
        EventDate::Specific(ymd(2014, 3, 5).and_hms_opt(21, 0, 0).unwrap())
    );
}

#[test]
fn test_late_evening_default_crosses_midnight() {
    let start = ymd(2014, 12, 31).and_hms_opt(23, 0, 0).unwrap();
    let range = DateRange {
        start: EventDate::Specific(start),
        end: None,
    };
    let e = builder()
        .build(Some(range), None, Some("Silvester"), &LinkCollector::new())
        .unwrap();
    assert_eq!(
        e.end,
        EventDate::Specific(ymd(2015, 1, 1).and_hms_opt(1, 0, 0).unwrap())
    );
}

#[test]
fn test_end_is_always_after_start() {
    let starts = [
        EventDate::AllDay(ymd(2014, 6, 1)),
        EventDate::Specific(ymd(2014, 6, 1).and_hms_opt(18, 30, 0).unwrap()),
    ];
    let ends = [None, Some(ymd(2014, 6, 1)), Some(ymd(2014, 6, 3))];
    for start in starts {
        for end in ends {
            let e = builder()
                .build(
                    Some(DateRange { start, end }),
                    None,
                    Some("Fieldday"),
                    &LinkCollector::new(),
                )
                .unwrap();
            assert!(e.end > e.start, "{:?} .. {:?}", e.start, e.end);
        }
    }
}

#[test]
fn test_skip_without_range_or_title() {
    let range = DateRange {
        start: EventDate::AllDay(ymd(2014, 3, 5)),
        end: None,
    };
    let links = LinkCollector::new();
    assert!(builder().build(None, None, Some("Clubabend"), &links).is_none());
    assert!(builder().build(Some(range), Some("M21"), None, &links).is_none());
    assert!(builder().build(Some(range), Some("M21"), Some("\nText"), &links).is_none());
}

#[test]
fn test_title_url_description_and_stamps() {
    let range = DateRange {
        start: EventDate::AllDay(ymd(2014, 3, 5)),
        end: None,
    };
    let links: LinkCollector = ["http://a.example/", "http://b.example/"]
        .into_iter()
        .collect();
    let now = Utc.with_ymd_and_hms(2014, 2, 1, 8, 0, 0).unwrap();
    let e = EventBuilder::new(3, now)
        .build(Some(range), Some("OV Pinneberg"), Some("Fuchsjagd\nim Forst"), &links)
        .unwrap();

    assert_eq!(e.title, "Fuchsjagd (OV Pinneberg)");
    assert_eq!(e.url.as_deref(), Some("http://a.example/"));
    assert_eq!(
        e.description,
        "Fuchsjagd\nim Forst\n\nweitere Informationen:\n  - http://a.example/\n  - http://b.example/"
    );
    assert_eq!(e.sequence, 3);
    assert_eq!(e.created, now);
    assert_eq!(e.last_modified, now);
}

#[test]
fn test_unrepresentable_end_skips_the_row() {
    let range = DateRange {
        start: EventDate::AllDay(NaiveDate::MAX),
        end: None,
    };
    assert!(
        builder()
            .build(Some(range), None, Some("Silvester"), &LinkCollector::new())
            .is_none()
    );
}
