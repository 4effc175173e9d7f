use cadence_rfc::rfc::rrule::{
    CallbackIterResult, Expander, QueryWindow, RecurrenceRule, Weekday, WeekdayNum,
};
use chrono::NaiveDateTime;

pub struct RRuleCase {
    pub name: &'static str,
    pub rule: fn() -> RecurrenceRule,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
    pub limit: usize,
    pub after: Option<&'static str>,
    pub before: Option<&'static str>,
}

impl RRuleCase {
    fn listed(
        name: &'static str,
        rule: fn() -> RecurrenceRule,
        expected: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            rule,
            expected: Some(expected),
            expected_len: None,
            limit: 100,
            after: None,
            before: None,
        }
    }
}

fn dt(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Failed to parse date-time {value}: {err}"))
}

fn rfc_start() -> NaiveDateTime {
    dt("1997-09-02T09:00:00")
}

fn every(days: &[Weekday]) -> Vec<WeekdayNum> {
    days.iter().copied().map(WeekdayNum::every).collect()
}

fn first_tuesday_last_thursday() -> Vec<WeekdayNum> {
    vec![
        WeekdayNum::nth(1, Weekday::Tuesday),
        WeekdayNum::nth(-1, Weekday::Thursday),
    ]
}

#[expect(clippy::too_many_lines)]
pub fn rrule_cases() -> Vec<RRuleCase> {
    use Weekday::{Friday, Monday, Saturday, Sunday, Thursday, Tuesday, Wednesday};

    vec![
        RRuleCase::listed(
            "yearly_basic",
            || RecurrenceRule::yearly(rfc_start()).with_count(3),
            &["1997-09-02T09:00:00", "1998-09-02T09:00:00", "1999-09-02T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_month",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_month(vec![1, 3])
            },
            &["1998-01-02T09:00:00", "1998-03-02T09:00:00", "1999-01-02T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_month_day",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![1, 3])
            },
            &["1997-09-03T09:00:00", "1997-10-01T09:00:00", "1997-10-03T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_nth_weekday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_day(first_tuesday_last_thursday())
            },
            &["1997-12-25T09:00:00", "1998-01-06T09:00:00", "1998-12-31T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_large_nth_weekday",
            || {
                RecurrenceRule::yearly(rfc_start()).with_count(3).with_by_day(vec![
                    WeekdayNum::nth(3, Tuesday),
                    WeekdayNum::nth(-3, Thursday),
                ])
            },
            &["1997-12-11T09:00:00", "1998-01-20T09:00:00", "1998-12-17T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_month_and_nth_weekday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_month(vec![1, 3])
                    .with_by_day(first_tuesday_last_thursday())
            },
            &["1998-01-06T09:00:00", "1998-01-29T09:00:00", "1998-03-03T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_month_and_weekday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_month(vec![1, 3])
                    .with_by_day(every(&[Tuesday, Thursday]))
            },
            &["1998-01-01T09:00:00", "1998-01-06T09:00:00", "1998-01-08T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_year_day",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(4)
                    .with_by_year_day(vec![1, 100, 200, 365])
            },
            &[
                "1997-12-31T09:00:00",
                "1998-01-01T09:00:00",
                "1998-04-10T09:00:00",
                "1998-07-19T09:00:00",
            ],
        ),
        RRuleCase::listed(
            "yearly_by_negative_year_day",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(4)
                    .with_by_year_day(vec![-365, -266, -166, -1])
            },
            &[
                "1997-12-31T09:00:00",
                "1998-01-01T09:00:00",
                "1998-04-10T09:00:00",
                "1998-07-19T09:00:00",
            ],
        ),
        RRuleCase::listed(
            "yearly_by_week_no",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_week_no(vec![20])
            },
            &["1998-05-11T09:00:00", "1998-05-12T09:00:00", "1998-05-13T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_week_no_one_monday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_week_no(vec![1])
                    .with_by_day(every(&[Monday]))
            },
            &["1997-12-29T09:00:00", "1999-01-04T09:00:00", "2000-01-03T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_week_no_fifty_two_sunday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_week_no(vec![52])
                    .with_by_day(every(&[Sunday]))
            },
            &["1997-12-28T09:00:00", "1998-12-27T09:00:00", "2000-01-02T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_last_week_no_sunday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_week_no(vec![-1])
                    .with_by_day(every(&[Sunday]))
            },
            &["1997-12-28T09:00:00", "1999-01-03T09:00:00", "2000-01-02T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_week_no_fifty_three_monday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_week_no(vec![53])
                    .with_by_day(every(&[Monday]))
            },
            &["1998-12-28T09:00:00", "2004-12-27T09:00:00", "2009-12-28T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_easter",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_easter(vec![0])
            },
            &["1998-04-12T09:00:00", "1999-04-04T09:00:00", "2000-04-23T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_easter_monday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_easter(vec![1])
            },
            &["1998-04-13T09:00:00", "1999-04-05T09:00:00", "2000-04-24T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_holy_saturday",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_easter(vec![-1])
            },
            &["1998-04-11T09:00:00", "1999-04-03T09:00:00", "2000-04-22T09:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_hour",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_hour(vec![6, 18])
            },
            &["1997-09-02T18:00:00", "1998-09-02T06:00:00", "1998-09-02T18:00:00"],
        ),
        RRuleCase::listed(
            "yearly_by_set_pos",
            || {
                RecurrenceRule::yearly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![15])
                    .with_by_hour(vec![6, 18])
                    .with_by_set_pos(vec![3, -3])
            },
            &["1997-11-15T18:00:00", "1998-02-15T06:00:00", "1998-11-15T18:00:00"],
        ),
        RRuleCase::listed(
            "yearly_leap_day",
            || RecurrenceRule::yearly(dt("2024-02-29T00:00:00")).with_count(2),
            &["2024-02-29T00:00:00", "2028-02-29T00:00:00"],
        ),
        RRuleCase {
            name: "yearly_january_every_day",
            rule: || {
                RecurrenceRule::yearly(dt("1998-01-01T09:00:00"))
                    .with_until(dt("2000-01-31T14:00:00"))
                    .with_by_month(vec![1])
                    .with_by_day(every(&[
                        Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
                    ]))
            },
            expected: None,
            expected_len: Some(93),
            limit: 200,
            after: None,
            before: None,
        },
        RRuleCase::listed(
            "monthly_basic",
            || RecurrenceRule::monthly(rfc_start()).with_count(3),
            &["1997-09-02T09:00:00", "1997-10-02T09:00:00", "1997-11-02T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_by_nth_weekday",
            || {
                RecurrenceRule::monthly(rfc_start())
                    .with_count(3)
                    .with_by_day(first_tuesday_last_thursday())
            },
            &["1997-09-02T09:00:00", "1997-09-25T09:00:00", "1997-10-07T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_by_set_pos",
            || {
                RecurrenceRule::monthly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![13, 17])
                    .with_by_hour(vec![6, 18])
                    .with_by_set_pos(vec![3, -3])
            },
            &["1997-09-13T18:00:00", "1997-09-17T06:00:00", "1997-10-13T18:00:00"],
        ),
        RRuleCase::listed(
            "monthly_last_day",
            || {
                RecurrenceRule::monthly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![-1])
            },
            &["1997-09-30T09:00:00", "1997-10-31T09:00:00", "1997-11-30T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_by_month_day_and_weekday",
            || {
                RecurrenceRule::monthly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![1, 3])
                    .with_by_day(every(&[Tuesday, Thursday]))
            },
            &["1998-01-01T09:00:00", "1998-02-03T09:00:00", "1998-03-03T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_friday_thirteenth",
            || {
                RecurrenceRule::monthly(rfc_start())
                    .with_count(3)
                    .with_by_month_day(vec![13])
                    .with_by_day(every(&[Friday]))
            },
            &["1998-02-13T09:00:00", "1998-03-13T09:00:00", "1998-11-13T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_last_workday",
            || {
                RecurrenceRule::monthly(dt("1997-09-29T09:00:00"))
                    .with_count(7)
                    .with_by_day(every(&[Monday, Tuesday, Wednesday, Thursday, Friday]))
                    .with_by_set_pos(vec![-1])
            },
            &[
                "1997-09-30T09:00:00",
                "1997-10-31T09:00:00",
                "1997-11-28T09:00:00",
                "1997-12-31T09:00:00",
                "1998-01-30T09:00:00",
                "1998-02-27T09:00:00",
                "1998-03-31T09:00:00",
            ],
        ),
        RRuleCase::listed(
            "monthly_third_midweek_day",
            || {
                RecurrenceRule::monthly(dt("1997-09-04T09:00:00"))
                    .with_count(3)
                    .with_by_day(every(&[Tuesday, Wednesday, Thursday]))
                    .with_by_set_pos(vec![3])
            },
            &["1997-09-04T09:00:00", "1997-10-07T09:00:00", "1997-11-06T09:00:00"],
        ),
        RRuleCase::listed(
            "monthly_first_and_last_day",
            || {
                RecurrenceRule::monthly(dt("1997-09-30T09:00:00"))
                    .with_count(10)
                    .with_by_month_day(vec![1, -1])
            },
            &[
                "1997-09-30T09:00:00",
                "1997-10-01T09:00:00",
                "1997-10-31T09:00:00",
                "1997-11-01T09:00:00",
                "1997-11-30T09:00:00",
                "1997-12-01T09:00:00",
                "1997-12-31T09:00:00",
                "1998-01-01T09:00:00",
                "1998-01-31T09:00:00",
                "1998-02-01T09:00:00",
            ],
        ),
        RRuleCase::listed(
            "weekly_basic",
            || RecurrenceRule::weekly(rfc_start()).with_count(3),
            &["1997-09-02T09:00:00", "1997-09-09T09:00:00", "1997-09-16T09:00:00"],
        ),
        RRuleCase::listed(
            "weekly_by_weekday",
            || {
                RecurrenceRule::weekly(rfc_start())
                    .with_count(3)
                    .with_by_day(every(&[Tuesday, Thursday]))
            },
            &["1997-09-02T09:00:00", "1997-09-04T09:00:00", "1997-09-09T09:00:00"],
        ),
        RRuleCase::listed(
            "weekly_ignores_ordinals",
            || {
                RecurrenceRule::weekly(rfc_start())
                    .with_count(3)
                    .with_by_day(first_tuesday_last_thursday())
            },
            &["1997-09-02T09:00:00", "1997-09-04T09:00:00", "1997-09-09T09:00:00"],
        ),
        RRuleCase::listed(
            "weekly_week_start_monday",
            || {
                RecurrenceRule::weekly(dt("1997-08-05T09:00:00"))
                    .with_interval(2)
                    .with_count(4)
                    .with_by_day(every(&[Tuesday, Sunday]))
            },
            &[
                "1997-08-05T09:00:00",
                "1997-08-10T09:00:00",
                "1997-08-19T09:00:00",
                "1997-08-24T09:00:00",
            ],
        ),
        RRuleCase::listed(
            "weekly_week_start_sunday",
            || {
                RecurrenceRule::weekly(dt("1997-08-05T09:00:00"))
                    .with_interval(2)
                    .with_count(4)
                    .with_wkst(Sunday)
                    .with_by_day(every(&[Tuesday, Sunday]))
            },
            &[
                "1997-08-05T09:00:00",
                "1997-08-17T09:00:00",
                "1997-08-19T09:00:00",
                "1997-08-31T09:00:00",
            ],
        ),
        RRuleCase {
            name: "weekly_every_other_until",
            rule: || {
                RecurrenceRule::weekly(dt("1997-09-01T09:00:00"))
                    .with_interval(2)
                    .with_until(dt("1997-12-24T00:00:00"))
                    .with_wkst(Sunday)
                    .with_by_day(every(&[Monday, Wednesday, Friday]))
            },
            expected: None,
            expected_len: Some(25),
            limit: 100,
            after: None,
            before: None,
        },
        RRuleCase::listed(
            "daily_basic",
            || RecurrenceRule::daily(rfc_start()).with_count(3),
            &["1997-09-02T09:00:00", "1997-09-03T09:00:00", "1997-09-04T09:00:00"],
        ),
        RRuleCase::listed(
            "daily_by_month",
            || {
                RecurrenceRule::daily(rfc_start())
                    .with_count(3)
                    .with_by_month(vec![1, 3])
            },
            &["1998-01-01T09:00:00", "1998-01-02T09:00:00", "1998-01-03T09:00:00"],
        ),
        RRuleCase::listed(
            "daily_by_hour",
            || {
                RecurrenceRule::daily(rfc_start())
                    .with_count(3)
                    .with_by_hour(vec![6, 18])
            },
            &["1997-09-02T18:00:00", "1997-09-03T06:00:00", "1997-09-03T18:00:00"],
        ),
        RRuleCase {
            name: "daily_after",
            rule: || RecurrenceRule::daily(dt("2012-02-01T09:30:00")),
            expected: Some(&[
                "2012-02-02T09:30:00",
                "2012-02-03T09:30:00",
                "2012-02-04T09:30:00",
            ]),
            expected_len: None,
            limit: 3,
            after: Some("2012-02-01T10:00:00"),
            before: None,
        },
        RRuleCase {
            name: "daily_before",
            rule: || RecurrenceRule::daily(rfc_start()).with_count(10),
            expected: Some(&[
                "1997-09-02T09:00:00",
                "1997-09-03T09:00:00",
                "1997-09-04T09:00:00",
                "1997-09-05T09:00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: None,
            before: Some("1997-09-05T09:00:00"),
        },
        RRuleCase {
            name: "daily_between",
            rule: || RecurrenceRule::daily(rfc_start()),
            expected: Some(&[
                "1998-03-01T09:00:00",
                "1998-03-02T09:00:00",
                "1998-03-03T09:00:00",
            ]),
            expected_len: None,
            limit: 100,
            after: Some("1998-03-01T00:00:00"),
            before: Some("1998-03-03T23:59:59"),
        },
        RRuleCase::listed(
            "hourly_basic",
            || RecurrenceRule::hourly(rfc_start()).with_count(3),
            &["1997-09-02T09:00:00", "1997-09-02T10:00:00", "1997-09-02T11:00:00"],
        ),
        RRuleCase::listed(
            "hourly_interval",
            || RecurrenceRule::hourly(rfc_start()).with_count(3).with_interval(2),
            &["1997-09-02T09:00:00", "1997-09-02T11:00:00", "1997-09-02T13:00:00"],
        ),
        RRuleCase::listed(
            "hourly_long_interval",
            || {
                RecurrenceRule::hourly(rfc_start())
                    .with_count(3)
                    .with_interval(769)
            },
            &["1997-09-02T09:00:00", "1997-10-04T10:00:00", "1997-11-05T11:00:00"],
        ),
        RRuleCase::listed(
            "hourly_by_month",
            || {
                RecurrenceRule::hourly(rfc_start())
                    .with_count(3)
                    .with_by_month(vec![1, 3])
            },
            &["1998-01-01T00:00:00", "1998-01-01T01:00:00", "1998-01-01T02:00:00"],
        ),
        RRuleCase::listed(
            "hourly_until",
            || {
                RecurrenceRule::hourly(rfc_start())
                    .with_interval(3)
                    .with_until(dt("1997-09-02T17:00:00"))
            },
            &["1997-09-02T09:00:00", "1997-09-02T12:00:00", "1997-09-02T15:00:00"],
        ),
        RRuleCase::listed(
            "minutely_long_interval",
            || {
                RecurrenceRule::minutely(rfc_start())
                    .with_count(3)
                    .with_interval(1501)
            },
            &["1997-09-02T09:00:00", "1997-09-03T10:01:00", "1997-09-04T11:02:00"],
        ),
        RRuleCase::listed(
            "minutely_by_hour",
            || {
                RecurrenceRule::minutely(rfc_start())
                    .with_count(3)
                    .with_by_hour(vec![6, 18])
            },
            &["1997-09-02T18:00:00", "1997-09-02T18:01:00", "1997-09-02T18:02:00"],
        ),
        RRuleCase::listed(
            "minutely_quarter_hours",
            || {
                RecurrenceRule::minutely(rfc_start())
                    .with_count(6)
                    .with_interval(15)
            },
            &[
                "1997-09-02T09:00:00",
                "1997-09-02T09:15:00",
                "1997-09-02T09:30:00",
                "1997-09-02T09:45:00",
                "1997-09-02T10:00:00",
                "1997-09-02T10:15:00",
            ],
        ),
        RRuleCase::listed(
            "secondly_long_interval",
            || {
                RecurrenceRule::secondly(rfc_start())
                    .with_count(3)
                    .with_interval(90_061)
            },
            &["1997-09-02T09:00:00", "1997-09-03T10:01:01", "1997-09-04T11:02:02"],
        ),
    ]
}

pub fn assert_case(case: &RRuleCase) {
    let spec = (case.rule)()
        .validate()
        .unwrap_or_else(|err| panic!("Failed to validate {}: {}", case.name, err));

    let window = match (case.after.map(dt), case.before.map(dt)) {
        (Some(after), Some(before)) => QueryWindow::between(after, before, true),
        (Some(after), None) => QueryWindow::between(after, NaiveDateTime::MAX, true),
        (None, Some(before)) => QueryWindow::before(before, true),
        (None, None) => QueryWindow::all(),
    };

    let limit = case.limit;
    let mut collector = CallbackIterResult::new(window, |_, kept| kept < limit);
    Expander::default().run(&spec, &mut collector);
    let actual = collector.into_values();

    if let Some(expected) = case.expected {
        let expected: Vec<NaiveDateTime> = expected.iter().map(|value| dt(value)).collect();
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}
