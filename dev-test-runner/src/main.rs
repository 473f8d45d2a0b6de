//! End-to-end scenarios: containing structs serialized and read back through
//! serde, with per-field call-site configs.
use std::process::ExitCode;

use enum_json::json::{from_value, to_value};
use enum_json::{Config, ProjectionKind, Role, Scalar, ScalarType, VariantSet};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// VARIANT SETS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Copy, Debug, PartialEq)]
enum SomeDays {
    Monday,
    Tuesday,
    Wednesday,
}

static SOME_DAYS: Lazy<VariantSet<SomeDays>> = Lazy::new(|| {
    const DAYS: [(SomeDays, &str, &str, &str); 3] = [
        (SomeDays::Monday, "MONDAY", "Lunes", "Monday"),
        (SomeDays::Tuesday, "TUESDAY", "Martes", "Tuesday"),
        (SomeDays::Wednesday, "WEDNESDAY", "Miercoles", "Wednesday"),
    ];
    let row = |d: &SomeDays| DAYS.iter().find(|row| row.0 == *d).copied();
    let mut builder = VariantSet::builder("SomeDays").config(Config::new(ProjectionKind::Value));
    for (day, name, _, _) in DAYS {
        builder = builder.variant(day, name);
    }
    builder
        .annotated_field("value", ScalarType::Text, Role::Value, move |d| row(d).map(|r| r.2.into()))
        .annotated_field("alias", ScalarType::Text, Role::Alias, move |d| row(d).map(|r| r.3.into()))
        .build()
        .expect("SomeDays declaration")
});
enum_json::impl_enum_json!(SomeDays, SOME_DAYS);

#[derive(Clone, Copy, Debug, PartialEq)]
enum SomeNums {
    One,
    Two,
    Three,
}

static SOME_NUMS: Lazy<VariantSet<SomeNums>> = Lazy::new(|| {
    VariantSet::builder("SomeNums")
        .config(Config::new(ProjectionKind::Value))
        .variant(SomeNums::One, "ONE")
        .variant(SomeNums::Two, "TWO")
        .variant(SomeNums::Three, "THREE")
        .annotated_field("value", ScalarType::Integer, Role::Value, |n: &SomeNums| {
            Some(Scalar::Integer(*n as i64 + 1))
        })
        .build()
        .expect("SomeNums declaration")
});
enum_json::impl_enum_json!(SomeNums, SOME_NUMS);

/// No type-level config: written by value, falling back to the name.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Answer {
    Yes,
    No,
}

static ANSWER: Lazy<VariantSet<Answer>> = Lazy::new(|| {
    VariantSet::builder("Answer")
        .variant(Answer::Yes, "YES")
        .variant(Answer::No, "NO")
        .build()
        .expect("Answer declaration")
});
enum_json::impl_enum_json!(Answer, ANSWER);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Fish {
    Trout,
    Bass,
}

static FISH: Lazy<VariantSet<Fish>> = Lazy::new(|| {
    VariantSet::builder("Fish")
        .config(Config::new(ProjectionKind::Name).with_case_insensitive(true))
        .variant(Fish::Trout, "TROUT")
        .variant(Fish::Bass, "BASS")
        .build()
        .expect("Fish declaration")
});
enum_json::impl_enum_json!(Fish, FISH);

#[derive(Clone, Copy, Debug, PartialEq)]
enum DogBreeds {
    Poodle,
    Labrador,
    Mutt,
}

/// Unannotated field found by its conventional name `value`.
static DOG_BREEDS: Lazy<VariantSet<DogBreeds>> = Lazy::new(|| {
    VariantSet::builder("DogBreeds")
        .config(Config::new(ProjectionKind::Value))
        .variant(DogBreeds::Poodle, "POODLE")
        .variant(DogBreeds::Labrador, "LABRADOR")
        .variant(DogBreeds::Mutt, "MUTT")
        .field("value", ScalarType::Text, |d: &DogBreeds| {
            Some(match d {
                DogBreeds::Poodle => "poodle".into(),
                DogBreeds::Labrador => "labrador".into(),
                DogBreeds::Mutt => "mutt".into(),
            })
        })
        .build()
        .expect("DogBreeds declaration")
});
enum_json::impl_enum_json!(DogBreeds, DOG_BREEDS);

#[derive(Clone, Copy, Debug, PartialEq)]
enum CatBreeds {
    Tabby,
    Persian,
    Stray,
}

/// Unannotated field found by its conventional name `alias`.
static CAT_BREEDS: Lazy<VariantSet<CatBreeds>> = Lazy::new(|| {
    VariantSet::builder("CatBreeds")
        .config(Config::new(ProjectionKind::Alias))
        .variant(CatBreeds::Tabby, "TABBY")
        .variant(CatBreeds::Persian, "PERSIAN")
        .variant(CatBreeds::Stray, "STRAY")
        .field("alias", ScalarType::Text, |c: &CatBreeds| {
            Some(match c {
                CatBreeds::Tabby => "tabby".into(),
                CatBreeds::Persian => "persian".into(),
                CatBreeds::Stray => "stray".into(),
            })
        })
        .build()
        .expect("CatBreeds declaration")
});
enum_json::impl_enum_json!(CatBreeds, CAT_BREEDS);

#[derive(Clone, Copy, Debug, PartialEq)]
enum MatchType {
    Unknown,
    Exact,
    Wildcard,
}

/// Explicit field names: written by `type`, also readable by `value`.
static MATCH_TYPE: Lazy<VariantSet<MatchType>> = Lazy::new(|| {
    let pick = |m: &MatchType| match m {
        MatchType::Unknown => (0i64, "unknown"),
        MatchType::Exact => (1, "exact"),
        MatchType::Wildcard => (2, "wildcard"),
    };
    VariantSet::builder("MatchType")
        .config(Config::new(ProjectionKind::Alias).with_value_field("value").with_alias_field("type"))
        .variant(MatchType::Unknown, "UNKNOWN")
        .variant(MatchType::Exact, "EXACT")
        .variant(MatchType::Wildcard, "WILDCARD")
        .field("value", ScalarType::Integer, move |m| Some(pick(m).0.into()))
        .field("type", ScalarType::Text, move |m| Some(pick(m).1.into()))
        .build()
        .expect("MatchType declaration")
});
enum_json::impl_enum_json!(MatchType, MATCH_TYPE);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Compound {
    Ab,
    OneTwo,
}

static COMPOUND: Lazy<VariantSet<Compound>> = Lazy::new(|| {
    VariantSet::builder("Compound")
        .config(Config::new(ProjectionKind::Value).with_value_field("value"))
        .variant(Compound::Ab, "AB")
        .variant(Compound::OneTwo, "ONE_TWO")
        .field("value", ScalarType::Text, |c: &Compound| {
            Some(match c {
                Compound::Ab => "A B".into(),
                Compound::OneTwo => "1 2".into(),
            })
        })
        .build()
        .expect("Compound declaration")
});
enum_json::impl_enum_json!(Compound, COMPOUND);

#[derive(Clone, Copy, Debug, PartialEq)]
enum SecretCode {
    CodeOne,
    CodeTwo,
}

static SECRET_CODE: Lazy<VariantSet<SecretCode>> = Lazy::new(|| {
    VariantSet::builder("SecretCode")
        .config(Config::new(ProjectionKind::Value).with_value_field("value"))
        .variant(SecretCode::CodeOne, "CODE_ONE")
        .variant(SecretCode::CodeTwo, "CODE_TWO")
        .field("value", ScalarType::Integer, |c: &SecretCode| {
            Some(match c {
                SecretCode::CodeOne => Scalar::Integer(1),
                SecretCode::CodeTwo => Scalar::Integer(2),
            })
        })
        .build()
        .expect("SecretCode declaration")
});
enum_json::impl_enum_json!(SecretCode, SECRET_CODE);

// ————————————————————————————————————————————————————————————————————————————
// CONTAINERS
// ————————————————————————————————————————————————————————————————————————————

enum_json::site!(mod by_ordinal = Config::new(ProjectionKind::Ordinal));
enum_json::site!(mod by_name = Config::new(ProjectionKind::Name));
enum_json::site!(mod by_value = Config::new(ProjectionKind::Value));
enum_json::site!(mod by_alias = Config::new(ProjectionKind::Alias));
enum_json::site!(mod name_strict = Config::new(ProjectionKind::Name));
enum_json::site!(mod name_loose = Config::new(ProjectionKind::Name).with_case_insensitive(true));

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SomeStuff {
    #[serde(with = "by_ordinal")]
    some_day: SomeDays,
    #[serde(with = "by_name")]
    next_day: SomeDays,
    middle_day: SomeDays,
    #[serde(with = "by_alias")]
    tuesday: SomeDays,
    #[serde(with = "by_ordinal")]
    a_num: SomeNums,
    #[serde(with = "by_name")]
    another_num: SomeNums,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SameStuffMultipleWays {
    #[serde(with = "by_ordinal")]
    ordinal_day: SomeDays,
    #[serde(with = "by_name")]
    name_day: SomeDays,
    #[serde(with = "by_value")]
    value_day: SomeDays,
    #[serde(with = "by_alias")]
    alias_day: SomeDays,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Food {
    #[serde(with = "name_strict::option", default)]
    fish: Option<Fish>,
    #[serde(with = "name_loose")]
    another_fish: Fish,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct MyDogs {
    first: DogBreeds,
    favorite: DogBreeds,
    wanted: DogBreeds,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct MyCats {
    first: CatBreeds,
    favorite: CatBreeds,
    wanted: CatBreeds,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct CompoundContainer {
    first: Compound,
    second: Compound,
}

/// A match type written as its integer value by hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "i64")]
enum LegacyMatchType {
    Unknown,
    Exact,
    Wildcard,
}

impl From<LegacyMatchType> for i64 {
    fn from(value: LegacyMatchType) -> Self {
        value as i64
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SCENARIOS
// ————————————————————————————————————————————————————————————————————————————

type Outcome = Result<(), String>;

fn ensure_eq<A: PartialEq + std::fmt::Debug>(left: A, right: A, what: &str) -> Outcome {
    if left == right {
        Ok(())
    } else {
        Err(format!("{what}: {left:?} != {right:?}"))
    }
}

fn decode<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(|error| format!("at {} → {}", error.path(), error.inner()))
}

fn encode<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|error| error.to_string())
}

/// A serialized token handed around as a string and read back as a document.
fn convert<T: enum_json::EnumJson + Clone>(json: String) -> Result<Option<T>, String> {
    from_value::<T>(&Value::String(json)).map_err(|error| error.to_string())
}

fn root_tokens() -> Outcome {
    ensure_eq(to_value(&Answer::No, None).map_err(|e| e.to_string())?, Value::from("NO"), "Answer")?;
    ensure_eq(encode(&SomeDays::Tuesday)?, r#""Martes""#.to_string(), "SomeDays")?;
    ensure_eq(encode(&SomeNums::Two)?, "2".to_string(), "SomeNums")?;

    ensure_eq(enum_json::json::from_str::<Answer>(r#""NO""#).map_err(|e| e.to_string())?, Some(Answer::No), "Answer")?;
    ensure_eq(enum_json::json::from_str::<SomeNums>("2").map_err(|e| e.to_string())?, Some(SomeNums::Two), "SomeNums")?;
    for bogus in [r#""FRED""#, "13", "2.0"] {
        ensure_eq(enum_json::json::from_str::<SomeNums>(bogus).map_err(|e| e.to_string())?, None, bogus)?;
    }
    Ok(())
}

fn some_stuff() -> Outcome {
    let src = r#"{"someDay":0,"nextDay":"TUESDAY","middleDay":"Miercoles","tuesday":"Tuesday","aNum":0,"anotherNum":"TWO"}"#;
    let stuff: SomeStuff = decode(src)?;
    ensure_eq(encode(&stuff)?, src.to_string(), "re-encoded")
}

fn same_stuff_multiple_ways() -> Outcome {
    let src = r#"{"ordinalDay":0,"nameDay":"MONDAY","valueDay":"Lunes","aliasDay":"Monday"}"#;
    let stuff: SameStuffMultipleWays = decode(src)?;
    let monday = SomeDays::Monday;
    ensure_eq(
        stuff,
        SameStuffMultipleWays { ordinal_day: monday, name_day: monday, value_day: monday, alias_day: monday },
        "decoded",
    )
}

fn food_case_rules() -> Outcome {
    let food: Food = decode(r#"{"fish":"bAsS","anotherFish":"tROUt"}"#)?;
    ensure_eq(food, Food { fish: None, another_fish: Fish::Trout }, "mixed case")?;
    let food: Food = decode(r#"{"fish":"BASS","anotherFish":"tROUt"}"#)?;
    ensure_eq(food.fish, Some(Fish::Bass), "exact case")
}

fn conventional_fields() -> Outcome {
    let dogs = MyDogs { first: DogBreeds::Poodle, favorite: DogBreeds::Mutt, wanted: DogBreeds::Labrador };
    let src = encode(&dogs)?;
    ensure_eq(src.as_str(), r#"{"first":"poodle","favorite":"mutt","wanted":"labrador"}"#, "dogs")?;
    ensure_eq(decode::<MyDogs>(&src)?, dogs, "dogs round trip")?;

    let cats = MyCats { first: CatBreeds::Tabby, favorite: CatBreeds::Stray, wanted: CatBreeds::Persian };
    let src = encode(&cats)?;
    ensure_eq(src.as_str(), r#"{"first":"tabby","favorite":"stray","wanted":"persian"}"#, "cats")?;
    ensure_eq(decode::<MyCats>(&src)?, cats, "cats round trip")
}

fn match_type_conversions() -> Outcome {
    let legacy = [LegacyMatchType::Unknown, LegacyMatchType::Exact, LegacyMatchType::Wildcard];
    let current = [MatchType::Unknown, MatchType::Exact, MatchType::Wildcard];
    for (old, new) in legacy.into_iter().zip(current) {
        let src = encode(&new)?;
        ensure_eq(convert::<MatchType>(src)?, Some(new), "self conversion")?;
        // integer tokens written by the legacy form read through the value field
        ensure_eq(convert::<MatchType>(encode(&old)?)?, Some(new), "legacy conversion")?;
    }
    Ok(())
}

fn compound_values() -> Outcome {
    for c in [Compound::Ab, Compound::OneTwo] {
        ensure_eq(convert::<Compound>(encode(&c)?)?, Some(c), "conversion")?;
    }
    let container = CompoundContainer { first: Compound::Ab, second: Compound::OneTwo };
    ensure_eq(decode::<CompoundContainer>(&encode(&container)?)?, container, "container")
}

fn secret_codes() -> Outcome {
    for c in [SecretCode::CodeOne, SecretCode::CodeTwo] {
        let src = encode(&c)?;
        ensure_eq(enum_json::json::from_str::<SecretCode>(&src).map_err(|e| e.to_string())?, Some(c), &src)?;
    }
    Ok(())
}

const SCENARIOS: &[(&str, fn() -> Outcome)] = &[
    ("root tokens", root_tokens),
    ("some stuff", some_stuff),
    ("same stuff multiple ways", same_stuff_multiple_ways),
    ("food case rules", food_case_rules),
    ("conventional fields", conventional_fields),
    ("match type conversions", match_type_conversions),
    ("compound values", compound_values),
    ("secret codes", secret_codes),
];

fn run_scenarios() -> usize {
    let mut failures = 0;
    for (name, scenario) in SCENARIOS {
        match scenario() {
            Ok(()) => eprintln!("✅ {name}"),
            Err(error) => {
                failures += 1;
                eprintln!("❌ {name}: {error}");
            }
        }
    }
    failures
}

fn main() -> ExitCode {
    if run_scenarios() == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
