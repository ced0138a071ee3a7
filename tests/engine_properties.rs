use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use county_dashboard::data::filter::observed_counties;
use county_dashboard::data::registry::county_key;
use county_dashboard::{apply, CountyRegistry, FilterSelection, Gender, SessionRecord};

const COUNTIES: [&str; 5] = ["Nairobi", "Kisumu", "Mombasa", "nakuru", "Kampala"];
const TA_TYPES: [&str; 3] = ["business plan", "market access", ""];

fn registry() -> CountyRegistry {
    CountyRegistry::new(["Nairobi", "Kisumu", "Mombasa", "Nakuru"])
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

fn record_strategy() -> impl Strategy<Value = SessionRecord> {
    (0u64..60, 0..COUNTIES.len(), gender_strategy(), 0..TA_TYPES.len()).prop_map(
        |(day, county, gender, ta)| {
            SessionRecord::new(base_date() + Days::new(day), COUNTIES[county])
                .with_gender(gender)
                .with_ta_type(TA_TYPES[ta])
        },
    )
}

fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
    (
        proptest::option::of((proptest::option::of(0u64..60), proptest::option::of(0u64..60))),
        proptest::option::of(proptest::collection::btree_set(0..COUNTIES.len(), 0..3)),
        proptest::option::of(gender_strategy()),
        proptest::option::of(0..TA_TYPES.len()),
    )
        .prop_map(|(dates, counties, gender, ta)| {
            let mut sel = FilterSelection::default();
            if let Some((start, end)) = dates {
                sel = sel.with_dates(
                    start.map(|d| base_date() + Days::new(d)),
                    end.map(|d| base_date() + Days::new(d)),
                );
            }
            sel.counties = counties.map(|idx| idx.into_iter().map(|i| COUNTIES[i].to_string()).collect());
            sel.gender = gender;
            sel.ta_type = ta.map(|i| TA_TYPES[i].to_string());
            sel
        })
}

#[test]
fn nairobi_scenario() {
    let records = vec![
        SessionRecord::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), "Nairobi")
            .with_gender(Gender::Female)
            .with_ta_type("business plan"),
        SessionRecord::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), "Kisumu")
            .with_gender(Gender::Male)
            .with_ta_type("market access"),
    ];
    let registry = CountyRegistry::new(["Nairobi", "Kisumu", "Mombasa"]);
    let view = apply(&records, &FilterSelection::default().with_county("Nairobi"), &registry);

    assert_eq!(view.records, vec![records[0].clone()]);
    let expected: BTreeSet<String> = ["Kisumu", "Mombasa"].iter().map(|s| s.to_string()).collect();
    assert_eq!(view.missing_counties, expected);
}

proptest! {
    #[test]
    fn prop_identity_filter(records in proptest::collection::vec(record_strategy(), 0..40)) {
        let view = apply(&records, &FilterSelection::default(), &registry());
        prop_assert_eq!(view.records, records);
    }

    #[test]
    fn prop_refiltering_with_identity_is_noop(
        records in proptest::collection::vec(record_strategy(), 0..40),
        sel in selection_strategy(),
    ) {
        let reg = registry();
        let first = apply(&records, &sel, &reg);
        let second = apply(&first.records, &FilterSelection::default(), &reg);
        prop_assert_eq!(second, first);
    }

    #[test]
    fn prop_apply_is_deterministic(
        records in proptest::collection::vec(record_strategy(), 0..40),
        sel in selection_strategy(),
    ) {
        let reg = registry();
        prop_assert_eq!(apply(&records, &sel, &reg), apply(&records, &sel, &reg));
    }

    #[test]
    fn prop_coverage_complement(
        records in proptest::collection::vec(record_strategy(), 0..40),
        sel in selection_strategy(),
    ) {
        let reg = registry();
        let view = apply(&records, &sel, &reg);
        let observed = observed_counties(&view.records);
        let missing: BTreeSet<String> = view.missing_counties.iter().map(|c| county_key(c)).collect();
        let all: BTreeSet<String> = reg.entries().map(|(k, _)| k.to_string()).collect();

        prop_assert!(observed.is_disjoint(&missing));
        let covered: BTreeSet<String> = observed.intersection(&all).cloned().collect();
        let union: BTreeSet<String> = covered.union(&missing).cloned().collect();
        prop_assert_eq!(union, all);
    }

    #[test]
    fn prop_adding_a_constraint_never_grows_the_result(
        records in proptest::collection::vec(record_strategy(), 0..40),
        sel in selection_strategy(),
        gender in gender_strategy(),
    ) {
        let reg = registry();
        let loose = apply(&records, &sel, &reg);
        let mut tighter_sel = sel.clone();
        if tighter_sel.gender.is_none() {
            tighter_sel.gender = Some(gender);
        }
        let tight = apply(&records, &tighter_sel, &reg);
        prop_assert!(tight.len() <= loose.len());
        prop_assert!(tight.records.iter().all(|r| loose.records.contains(r)));
    }

    #[test]
    fn prop_date_bounds_are_inclusive(record in record_strategy()) {
        let sel = FilterSelection::default().with_dates(Some(record.date), Some(record.date));
        let view = apply(std::slice::from_ref(&record), &sel, &registry());
        prop_assert_eq!(view.len(), 1);
    }
}
