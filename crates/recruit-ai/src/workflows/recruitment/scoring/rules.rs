use super::super::domain::{AgeGroup, CandidateProfile, Education, Location, SalaryExpectation};
use super::{ScoreComponent, ScoreFactor};

const VEHICLE_POINTS: u32 = 4;
const SPOKEN_ENGLISH_POINTS: u32 = 4;
const HOME_CITY: &str = "bhopal";
const HOME_CITY_POINTS: u32 = 3;
const OTHER_CITY_POINTS: u32 = 1;

pub(crate) const fn education_points(education: Education) -> u32 {
    match education {
        Education::None => 0,
        Education::GraduateAny => 2,
        Education::GraduateMathsEconomics => 3,
        Education::MbaOrPgFinancial => 4,
    }
}

pub(crate) const fn age_group_points(age_group: AgeGroup) -> u32 {
    match age_group {
        AgeGroup::None => 0,
        AgeGroup::From20To25 => 1,
        AgeGroup::From26To30 => 2,
        AgeGroup::From31To45 => 3,
        AgeGroup::Above45 => 2,
    }
}

pub(crate) const fn location_points(location: Location) -> u32 {
    match location {
        Location::HbRoad => 4,
        Location::AreraColony => 3,
        Location::Bhel | Location::Mandideep => 2,
        Location::Others => 1,
        Location::Unspecified => 0,
    }
}

pub(crate) const fn salary_points(salary: SalaryExpectation) -> u32 {
    match salary {
        SalaryExpectation::From10To12K => 4,
        SalaryExpectation::From12To15K | SalaryExpectation::From15To18K => 3,
        SalaryExpectation::From18To20K | SalaryExpectation::From20To25K => 2,
        SalaryExpectation::Above25K => 1,
        SalaryExpectation::Unspecified => 0,
    }
}

pub(crate) fn native_place_points(native_place: &str) -> u32 {
    if native_place.trim().eq_ignore_ascii_case(HOME_CITY) {
        HOME_CITY_POINTS
    } else {
        OTHER_CITY_POINTS
    }
}

fn component(factor: ScoreFactor, points: u32, notes: String) -> ScoreComponent {
    ScoreComponent {
        factor,
        points,
        notes,
    }
}

pub(crate) fn score_components(profile: &CandidateProfile) -> Vec<ScoreComponent> {
    let experience = &profile.experience;
    let operations = &profile.operations;

    vec![
        component(
            ScoreFactor::Education,
            education_points(profile.education),
            format!("education {:?}", profile.education),
        ),
        component(
            ScoreFactor::AgeGroup,
            age_group_points(profile.age_group),
            format!("age group {:?}", profile.age_group),
        ),
        component(
            ScoreFactor::Vehicle,
            if profile.has_vehicle { VEHICLE_POINTS } else { 0 },
            if profile.has_vehicle {
                "owns a vehicle".to_string()
            } else {
                "no vehicle".to_string()
            },
        ),
        component(
            ScoreFactor::Experience,
            experience.total(),
            format!(
                "administrative {} + insurance sales {} + any sales {} + field work {}",
                experience.administrative.value(),
                experience.insurance_sales.value(),
                experience.any_sales.value(),
                experience.field_work.value()
            ),
        ),
        component(
            ScoreFactor::Operations,
            operations.total(),
            format!(
                "data management {} + back office {} + mis {}",
                operations.data_management.value(),
                operations.back_office.value(),
                operations.mis.value()
            ),
        ),
        component(
            ScoreFactor::Location,
            location_points(profile.location),
            format!("location {:?}", profile.location),
        ),
        component(
            ScoreFactor::NativePlace,
            native_place_points(&profile.native_place),
            if profile.native_place.trim().is_empty() {
                "native place not given".to_string()
            } else {
                format!("native place {}", profile.native_place.trim())
            },
        ),
        component(
            ScoreFactor::SpokenEnglish,
            if profile.spoken_english {
                SPOKEN_ENGLISH_POINTS
            } else {
                0
            },
            if profile.spoken_english {
                "speaks English".to_string()
            } else {
                "no spoken English".to_string()
            },
        ),
        component(
            ScoreFactor::SalaryExpectation,
            salary_points(profile.salary_expectation),
            format!("salary expectation {:?}", profile.salary_expectation),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_place_match_ignores_case_and_padding() {
        assert_eq!(native_place_points(" BHOPAL "), 3);
        assert_eq!(native_place_points("bhopal"), 3);
        assert_eq!(native_place_points("Indore"), 1);
        assert_eq!(native_place_points(""), 1);
        assert_eq!(native_place_points("Bhopal City"), 1);
    }

    #[test]
    fn unspecified_categories_contribute_nothing() {
        assert_eq!(education_points(Education::None), 0);
        assert_eq!(age_group_points(AgeGroup::None), 0);
        assert_eq!(location_points(Location::Unspecified), 0);
        assert_eq!(salary_points(SalaryExpectation::Unspecified), 0);
    }

    #[test]
    fn components_follow_table_order() {
        let factors: Vec<_> = score_components(&CandidateProfile::default())
            .into_iter()
            .map(|component| component.factor)
            .collect();
        assert_eq!(
            factors,
            vec![
                ScoreFactor::Education,
                ScoreFactor::AgeGroup,
                ScoreFactor::Vehicle,
                ScoreFactor::Experience,
                ScoreFactor::Operations,
                ScoreFactor::Location,
                ScoreFactor::NativePlace,
                ScoreFactor::SpokenEnglish,
                ScoreFactor::SalaryExpectation,
            ]
        );
    }
}
