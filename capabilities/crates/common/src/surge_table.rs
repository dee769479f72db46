//! Built-in seasonal surge table.
//!
//! Seasonal averages of above-baseline admissions, one record per month.
//! `total_surge_patients` is derived from the entries so the two never drift.

use std::collections::BTreeMap;

use crate::surge::{MonthRecord, SurgeDatabase, SurgeEntry};

const DATA_SOURCE: &str = "Arogyam hospital admission records, seasonal averages 2019-2024";
const LAST_UPDATED: &str = "2024-12-31";

fn entry(
    category: &str,
    conditions: &[&str],
    patient_count: u32,
    icu_admissions: u32,
    oxygen_cylinders_used: Option<u32>,
    primary_cause: &str,
) -> SurgeEntry {
    SurgeEntry {
        disease_category: category.to_string(),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        patient_count,
        icu_admissions,
        oxygen_cylinders_used,
        primary_cause: primary_cause.to_string(),
    }
}

fn month(
    name: &str,
    festivals: &[&str],
    average_air_quality_index: u32,
    baseline_patient_count: u32,
    surge_entries: Vec<SurgeEntry>,
    notes: &str,
) -> MonthRecord {
    let total_surge_patients = surge_entries.iter().map(|e| e.patient_count).sum();
    MonthRecord {
        month_name: name.to_string(),
        festivals: festivals.iter().map(|f| f.to_string()).collect(),
        average_air_quality_index,
        baseline_patient_count,
        surge_entries,
        total_surge_patients,
        notes: notes.to_string(),
    }
}

pub(crate) fn default_database() -> SurgeDatabase {
    let mut months = BTreeMap::new();

    months.insert(
        1,
        month(
            "January",
            &["Lohri", "Makar Sankranti", "Pongal", "Republic Day"],
            310,
            420,
            vec![
                entry(
                    "respiratory",
                    &["Pneumonia", "Asthma exacerbation", "COPD exacerbation", "Acute bronchitis"],
                    520,
                    48,
                    Some(310),
                    "Winter smog and cold waves trap pollutants near ground level",
                ),
                entry(
                    "cardiac",
                    &["Myocardial infarction", "Hypertensive crisis"],
                    210,
                    62,
                    Some(90),
                    "Cold-induced vasoconstriction raises cardiac event rates",
                ),
                entry(
                    "accident",
                    &["Kite string lacerations", "Fall injuries", "Road traffic injuries"],
                    140,
                    18,
                    None,
                    "Kite-flying manja injuries around Sankranti and dense-fog road accidents",
                ),
            ],
            "Cold wave and smog month; elderly respiratory and cardiac patients dominate ICU demand.",
        ),
    );

    months.insert(
        2,
        month(
            "February",
            &["Vasant Panchami", "Maha Shivaratri"],
            240,
            400,
            vec![
                entry(
                    "respiratory",
                    &["Viral bronchitis", "Asthma exacerbation", "Pneumonia"],
                    380,
                    30,
                    Some(210),
                    "Lingering winter pollution combined with seasonal viral infections",
                ),
                entry(
                    "infectious",
                    &["Influenza", "Viral fever"],
                    260,
                    12,
                    Some(40),
                    "Late-winter influenza wave",
                ),
                entry(
                    "cardiac",
                    &["Myocardial infarction", "Heart failure decompensation"],
                    150,
                    40,
                    Some(60),
                    "Residual cold stress and fasting-related fluid shifts",
                ),
            ],
            "Winter load tapers off; influenza cases keep outpatient volumes high.",
        ),
    );

    months.insert(
        3,
        month(
            "March",
            &["Holi"],
            180,
            390,
            vec![
                entry(
                    "skin",
                    &["Contact dermatitis", "Chemical conjunctivitis", "Skin allergy"],
                    240,
                    2,
                    None,
                    "Synthetic Holi colours containing industrial dyes and heavy metals",
                ),
                entry(
                    "gastro",
                    &["Acute gastroenteritis", "Food poisoning", "Bhang intoxication"],
                    310,
                    14,
                    None,
                    "Contaminated festive food and drinks",
                ),
                entry(
                    "accident",
                    &["Road traffic injuries", "Fall injuries", "Eye trauma"],
                    190,
                    22,
                    None,
                    "Holi revelry, intoxicated driving and water-balloon injuries",
                ),
                entry(
                    "respiratory",
                    &["Allergic rhinitis", "Asthma exacerbation"],
                    160,
                    10,
                    Some(70),
                    "Seasonal transition pollen and inhaled colour powder",
                ),
            ],
            "Holi week produces a sharp two-to-three day spike in skin, eye and trauma cases.",
        ),
    );

    months.insert(
        4,
        month(
            "April",
            &["Ram Navami", "Baisakhi", "Mahavir Jayanti"],
            150,
            380,
            vec![
                entry(
                    "heat_related",
                    &["Heat exhaustion", "Dehydration"],
                    280,
                    20,
                    None,
                    "Early summer heat spells",
                ),
                entry(
                    "gastro",
                    &["Acute gastroenteritis", "Typhoid"],
                    240,
                    10,
                    None,
                    "Rising temperatures accelerate street food contamination",
                ),
                entry(
                    "respiratory",
                    &["Allergic asthma", "Upper respiratory infection"],
                    130,
                    8,
                    Some(50),
                    "Dust and pollen",
                ),
            ],
            "Quietest month of the year; good window for equipment maintenance and staff leave.",
        ),
    );

    months.insert(
        5,
        month(
            "May",
            &["Buddha Purnima"],
            165,
            400,
            vec![
                entry(
                    "heat_related",
                    &["Heat stroke", "Severe dehydration", "Acute kidney injury"],
                    620,
                    75,
                    None,
                    "Peak summer heatwave with daytime temperatures above 45°C",
                ),
                entry(
                    "gastro",
                    &["Acute gastroenteritis", "Cholera"],
                    310,
                    15,
                    None,
                    "Water scarcity and unsafe drinking water",
                ),
                entry(
                    "cardiac",
                    &["Arrhythmia", "Myocardial infarction"],
                    180,
                    45,
                    Some(70),
                    "Heat stress on patients with existing cardiac disease",
                ),
                entry(
                    "respiratory",
                    &["Asthma exacerbation", "Dust inhalation"],
                    140,
                    9,
                    Some(55),
                    "Pre-monsoon dust storms",
                ),
            ],
            "Heatwave month; ICU demand driven by heat stroke and acute kidney injury.",
        ),
    );

    months.insert(
        6,
        month(
            "June",
            &["Eid al-Adha"],
            120,
            410,
            vec![
                entry(
                    "heat_related",
                    &["Heat exhaustion", "Dehydration"],
                    410,
                    40,
                    None,
                    "Pre-monsoon heat and humidity",
                ),
                entry(
                    "gastro",
                    &["Acute gastroenteritis", "Hepatitis A"],
                    280,
                    12,
                    None,
                    "Early monsoon contamination of water supplies",
                ),
                entry(
                    "infectious",
                    &["Dengue", "Malaria"],
                    190,
                    14,
                    None,
                    "First vector breeding cycle after early showers",
                ),
                entry(
                    "respiratory",
                    &["Upper respiratory infection", "Asthma exacerbation"],
                    120,
                    8,
                    Some(45),
                    "Pre-monsoon dust and humidity swings",
                ),
            ],
            "Transition month; vector-borne cases start rising in the last two weeks.",
        ),
    );

    months.insert(
        7,
        month(
            "July",
            &["Rath Yatra", "Guru Purnima"],
            75,
            430,
            vec![
                entry(
                    "infectious",
                    &["Dengue", "Malaria", "Leptospirosis"],
                    520,
                    45,
                    None,
                    "Monsoon waterlogging creates mosquito breeding grounds",
                ),
                entry(
                    "gastro",
                    &["Cholera", "Typhoid", "Hepatitis A"],
                    460,
                    25,
                    None,
                    "Flooding contaminates drinking water",
                ),
                entry(
                    "respiratory",
                    &["Viral pneumonia", "Bronchiolitis"],
                    150,
                    10,
                    Some(60),
                    "Damp conditions favour viral respiratory infections",
                ),
                entry(
                    "skin",
                    &["Fungal infection", "Cellulitis"],
                    110,
                    0,
                    None,
                    "Prolonged exposure to flood water",
                ),
            ],
            "Monsoon onset; platelet and IV fluid demand climbs with dengue admissions.",
        ),
    );

    months.insert(
        8,
        month(
            "August",
            &["Independence Day", "Raksha Bandhan", "Janmashtami"],
            70,
            440,
            vec![
                entry(
                    "infectious",
                    &["Dengue", "Malaria", "Chikungunya"],
                    610,
                    58,
                    None,
                    "Peak dengue and malaria transmission",
                ),
                entry(
                    "gastro",
                    &["Typhoid", "Acute gastroenteritis"],
                    390,
                    20,
                    None,
                    "Continued water contamination",
                ),
                entry(
                    "respiratory",
                    &["Viral pneumonia", "Asthma exacerbation"],
                    170,
                    12,
                    Some(70),
                    "Humid monsoon air and viral circulation",
                ),
                entry(
                    "accident",
                    &["Fall injuries", "Road traffic injuries"],
                    120,
                    15,
                    None,
                    "Waterlogged roads and Dahi Handi human-pyramid falls",
                ),
            ],
            "Peak monsoon disease month; blood bank platelet stock is the usual bottleneck.",
        ),
    );

    months.insert(
        9,
        month(
            "September",
            &["Ganesh Chaturthi", "Onam"],
            95,
            430,
            vec![
                entry(
                    "infectious",
                    &["Dengue", "Malaria", "Typhus"],
                    560,
                    50,
                    None,
                    "Post-monsoon dengue peak",
                ),
                entry(
                    "gastro",
                    &["Acute gastroenteritis", "Food poisoning"],
                    280,
                    12,
                    None,
                    "Community feasts during Ganesh Chaturthi and Onam",
                ),
                entry(
                    "respiratory",
                    &["Viral pneumonia", "Bronchitis"],
                    150,
                    11,
                    Some(65),
                    "Seasonal viral infections",
                ),
                entry(
                    "accident",
                    &["Crowd crush injuries", "Drowning", "Road traffic injuries"],
                    140,
                    16,
                    None,
                    "Procession crowds and idol immersion drownings",
                ),
            ],
            "Dengue remains high; immersion days need trauma and drowning readiness.",
        ),
    );

    months.insert(
        10,
        month(
            "October",
            &["Navratri", "Durga Puja", "Dussehra"],
            210,
            420,
            vec![
                entry(
                    "respiratory",
                    &["Asthma exacerbation", "COPD exacerbation", "Bronchitis"],
                    420,
                    35,
                    Some(240),
                    "Stubble burning begins and Dussehra effigy smoke",
                ),
                entry(
                    "infectious",
                    &["Dengue", "Viral fever"],
                    310,
                    22,
                    None,
                    "Lingering post-monsoon dengue cases",
                ),
                entry(
                    "accident",
                    &["Crowd crush injuries", "Road traffic injuries", "Burns"],
                    160,
                    18,
                    None,
                    "Festival crowds and heavy night-time traffic",
                ),
                entry(
                    "gastro",
                    &["Food poisoning", "Acute gastroenteritis"],
                    150,
                    6,
                    None,
                    "Fasting and festive food",
                ),
            ],
            "Air quality turns from moderate to poor; respiratory load starts its winter climb.",
        ),
    );

    months.insert(
        11,
        month(
            "November",
            &["Diwali", "Chhath Puja", "Guru Nanak Jayanti"],
            385,
            450,
            vec![
                entry(
                    "respiratory",
                    &["Asthma attack", "COPD exacerbation", "Acute bronchitis", "Pneumonia"],
                    980,
                    96,
                    Some(620),
                    "Firecracker smoke on top of peak stubble-burning smog",
                ),
                entry(
                    "accident",
                    &["Firecracker burns", "Eye injuries", "Hand injuries"],
                    430,
                    38,
                    None,
                    "Firecracker accidents during Diwali week",
                ),
                entry(
                    "cardiac",
                    &["Myocardial infarction", "Stroke", "Hypertensive crisis"],
                    310,
                    85,
                    Some(140),
                    "Pollution-triggered cardiac events and festive overindulgence",
                ),
                entry(
                    "gastro",
                    &["Food poisoning", "Acute gastroenteritis"],
                    220,
                    9,
                    None,
                    "Adulterated sweets and overeating",
                ),
            ],
            "Busiest month of the year; AQI regularly crosses 400 in Diwali week.",
        ),
    );

    months.insert(
        12,
        month(
            "December",
            &["Christmas", "New Year's Eve"],
            340,
            440,
            vec![
                entry(
                    "respiratory",
                    &["Pneumonia", "COPD exacerbation", "Asthma exacerbation"],
                    610,
                    58,
                    Some(380),
                    "Winter temperature inversion traps pollutants",
                ),
                entry(
                    "cardiac",
                    &["Myocardial infarction", "Heart failure decompensation"],
                    240,
                    70,
                    Some(110),
                    "Cold-induced cardiac stress",
                ),
                entry(
                    "accident",
                    &["Road traffic injuries", "Head injuries"],
                    180,
                    24,
                    None,
                    "New Year's Eve drunk driving and dense fog",
                ),
            ],
            "Winter smog persists; trauma spike on New Year's Eve night.",
        ),
    );

    SurgeDatabase {
        data_source: DATA_SOURCE.to_string(),
        last_updated: LAST_UPDATED.to_string(),
        months,
    }
}
