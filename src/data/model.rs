use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// CellValue – a single decoded cell, before it is assigned to a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the decoders.
///
/// Decoders never decide what a column means; they hand a `CellValue` to
/// [`LiftRecord::assign`], which coerces it to the column's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Interpret the cell as a number. Numeric text is parsed; anything
    /// else (including unparseable text such as `"DQ"`) is absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Interpret the cell as text. Whole floats print without a fraction so
    /// a weight class stored as `93.0` compares equal to the CSV's `"93"`.
    pub fn into_text(self) -> String {
        match self {
            CellValue::Text(s) => s,
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => (v as i64).to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – every column the record type knows about
// ---------------------------------------------------------------------------

macro_rules! columns {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A known column of the results table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Column {
            $($variant),+
        }

        impl Column {
            pub const ALL: &'static [Column] = &[$(Column::$variant),+];

            /// Header name as it appears in the source file.
            pub fn name(self) -> &'static str {
                match self {
                    $(Column::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Column> {
                match name {
                    $($name => Some(Column::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

columns! {
    Name => "Name",
    Sex => "Sex",
    Event => "Event",
    Equipment => "Equipment",
    Age => "Age",
    AgeClass => "AgeClass",
    BirthYearClass => "BirthYearClass",
    Division => "Division",
    BodyweightKg => "BodyweightKg",
    WeightClassKg => "WeightClassKg",
    Squat1Kg => "Squat1Kg",
    Squat2Kg => "Squat2Kg",
    Squat3Kg => "Squat3Kg",
    Squat4Kg => "Squat4Kg",
    Best3SquatKg => "Best3SquatKg",
    Bench1Kg => "Bench1Kg",
    Bench2Kg => "Bench2Kg",
    Bench3Kg => "Bench3Kg",
    Bench4Kg => "Bench4Kg",
    Best3BenchKg => "Best3BenchKg",
    Deadlift1Kg => "Deadlift1Kg",
    Deadlift2Kg => "Deadlift2Kg",
    Deadlift3Kg => "Deadlift3Kg",
    Deadlift4Kg => "Deadlift4Kg",
    Best3DeadliftKg => "Best3DeadliftKg",
    TotalKg => "TotalKg",
    Place => "Place",
    Dots => "Dots",
    Wilks => "Wilks",
    Glossbrenner => "Glossbrenner",
    Goodlift => "Goodlift",
    Tested => "Tested",
    Country => "Country",
    State => "State",
    Federation => "Federation",
    ParentFederation => "ParentFederation",
    Date => "Date",
    MeetCountry => "MeetCountry",
    MeetState => "MeetState",
    MeetTown => "MeetTown",
    MeetName => "MeetName",
    Sanctioned => "Sanctioned",
    MaxLift => "MaxLift",
}

// ---------------------------------------------------------------------------
// LiftRecord – one row of the results table
// ---------------------------------------------------------------------------

/// One competition result. Text columns are empty when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiftRecord {
    pub name: String,
    pub sex: String,
    pub event: String,
    pub equipment: String,
    pub age: Option<f64>,
    pub age_class: String,
    pub birth_year_class: String,
    pub division: String,
    pub bodyweight_kg: Option<f64>,
    pub weight_class_kg: String,
    pub squat_kg: [Option<f64>; 4],
    pub best3_squat_kg: Option<f64>,
    pub bench_kg: [Option<f64>; 4],
    pub best3_bench_kg: Option<f64>,
    pub deadlift_kg: [Option<f64>; 4],
    pub best3_deadlift_kg: Option<f64>,
    pub total_kg: Option<f64>,
    pub place: Option<f64>,
    pub dots: Option<f64>,
    pub wilks: Option<f64>,
    pub glossbrenner: Option<f64>,
    pub goodlift: Option<f64>,
    pub tested: String,
    pub country: String,
    pub state: String,
    pub federation: String,
    pub parent_federation: String,
    pub date: String,
    pub meet_country: String,
    pub meet_state: String,
    pub meet_town: String,
    pub meet_name: String,
    pub sanctioned: String,
    /// Which lift this row is ranked under (`"Bench"`, `"Squat"`, `"Deadlift"`).
    pub max_lift: String,
}

impl LiftRecord {
    /// Store a decoded cell in the field backing `column`.
    pub fn assign(&mut self, column: Column, value: CellValue) {
        if let Some(slot) = self.text_slot(column) {
            *slot = value.into_text();
        } else if let Some(slot) = self.number_slot(column) {
            *slot = value.as_f64();
        }
    }

    fn text_slot(&mut self, column: Column) -> Option<&mut String> {
        use Column::*;
        let slot = match column {
            Name => &mut self.name,
            Sex => &mut self.sex,
            Event => &mut self.event,
            Equipment => &mut self.equipment,
            AgeClass => &mut self.age_class,
            BirthYearClass => &mut self.birth_year_class,
            Division => &mut self.division,
            WeightClassKg => &mut self.weight_class_kg,
            Tested => &mut self.tested,
            Country => &mut self.country,
            State => &mut self.state,
            Federation => &mut self.federation,
            ParentFederation => &mut self.parent_federation,
            Date => &mut self.date,
            MeetCountry => &mut self.meet_country,
            MeetState => &mut self.meet_state,
            MeetTown => &mut self.meet_town,
            MeetName => &mut self.meet_name,
            Sanctioned => &mut self.sanctioned,
            MaxLift => &mut self.max_lift,
            _ => return None,
        };
        Some(slot)
    }

    fn number_slot(&mut self, column: Column) -> Option<&mut Option<f64>> {
        use Column::*;
        let slot = match column {
            Age => &mut self.age,
            BodyweightKg => &mut self.bodyweight_kg,
            Squat1Kg => &mut self.squat_kg[0],
            Squat2Kg => &mut self.squat_kg[1],
            Squat3Kg => &mut self.squat_kg[2],
            Squat4Kg => &mut self.squat_kg[3],
            Best3SquatKg => &mut self.best3_squat_kg,
            Bench1Kg => &mut self.bench_kg[0],
            Bench2Kg => &mut self.bench_kg[1],
            Bench3Kg => &mut self.bench_kg[2],
            Bench4Kg => &mut self.bench_kg[3],
            Best3BenchKg => &mut self.best3_bench_kg,
            Deadlift1Kg => &mut self.deadlift_kg[0],
            Deadlift2Kg => &mut self.deadlift_kg[1],
            Deadlift3Kg => &mut self.deadlift_kg[2],
            Deadlift4Kg => &mut self.deadlift_kg[3],
            Best3DeadliftKg => &mut self.best3_deadlift_kg,
            TotalKg => &mut self.total_kg,
            Place => &mut self.place,
            Dots => &mut self.dots,
            Wilks => &mut self.wilks,
            Glossbrenner => &mut self.glossbrenner,
            Goodlift => &mut self.goodlift,
            _ => return None,
        };
        Some(slot)
    }
}

// ---------------------------------------------------------------------------
// LiftType – the statistic being charted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LiftType {
    #[default]
    Bench,
    Squat,
    Deadlift,
}

impl LiftType {
    pub const ALL: [LiftType; 3] = [LiftType::Bench, LiftType::Squat, LiftType::Deadlift];

    /// The value of the `MaxLift` indicator for rows ranked under this lift.
    pub fn name(self) -> &'static str {
        match self {
            LiftType::Bench => "Bench",
            LiftType::Squat => "Squat",
            LiftType::Deadlift => "Deadlift",
        }
    }

    /// Column holding the best successful attempt for this lift.
    pub fn best_result_column(self) -> Column {
        match self {
            LiftType::Bench => Column::Best3BenchKg,
            LiftType::Squat => Column::Best3SquatKg,
            LiftType::Deadlift => Column::Best3DeadliftKg,
        }
    }

    pub fn best_result(self, record: &LiftRecord) -> Option<f64> {
        match self {
            LiftType::Bench => record.best3_bench_kg,
            LiftType::Squat => record.best3_squat_kg,
            LiftType::Deadlift => record.best3_deadlift_kg,
        }
    }
}

impl fmt::Display for LiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LiftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LiftType::ALL
            .into_iter()
            .find(|lift| lift.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown lift '{s}' (expected Bench, Squat or Deadlift)"))
    }
}

// ---------------------------------------------------------------------------
// FilterColumn – categorical columns offered as filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterColumn {
    Sex,
    Equipment,
    BirthYearClass,
    AgeClass,
    WeightClassKg,
    Sanctioned,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 6] = [
        FilterColumn::Sex,
        FilterColumn::Equipment,
        FilterColumn::BirthYearClass,
        FilterColumn::AgeClass,
        FilterColumn::WeightClassKg,
        FilterColumn::Sanctioned,
    ];

    pub fn name(self) -> &'static str {
        self.column().name()
    }

    pub fn column(self) -> Column {
        match self {
            FilterColumn::Sex => Column::Sex,
            FilterColumn::Equipment => Column::Equipment,
            FilterColumn::BirthYearClass => Column::BirthYearClass,
            FilterColumn::AgeClass => Column::AgeClass,
            FilterColumn::WeightClassKg => Column::WeightClassKg,
            FilterColumn::Sanctioned => Column::Sanctioned,
        }
    }

    /// The record's value for this column, or `None` when it is empty.
    pub fn value_of(self, record: &LiftRecord) -> Option<&str> {
        let value = match self {
            FilterColumn::Sex => &record.sex,
            FilterColumn::Equipment => &record.equipment,
            FilterColumn::BirthYearClass => &record.birth_year_class,
            FilterColumn::AgeClass => &record.age_class,
            FilterColumn::WeightClassKg => &record.weight_class_kg,
            FilterColumn::Sanctioned => &record.sanctioned,
        };
        Some(value.as_str()).filter(|v| !v.is_empty())
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip() {
        for &column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name("NotAColumn"), None);
    }

    #[test]
    fn assign_coerces_to_declared_type() {
        let mut rec = LiftRecord::default();
        rec.assign(Column::WeightClassKg, CellValue::Float(93.0));
        rec.assign(Column::Best3BenchKg, CellValue::Text("142.5".into()));
        rec.assign(Column::Place, CellValue::Text("DQ".into()));
        rec.assign(Column::Bench2Kg, CellValue::Integer(120));
        rec.assign(Column::Sex, CellValue::Null);

        assert_eq!(rec.weight_class_kg, "93");
        assert_eq!(rec.best3_bench_kg, Some(142.5));
        assert_eq!(rec.place, None);
        assert_eq!(rec.bench_kg[1], Some(120.0));
        assert_eq!(rec.sex, "");
    }

    #[test]
    fn lift_type_lookup_table() {
        let rec = LiftRecord {
            best3_bench_kg: Some(100.0),
            best3_squat_kg: Some(150.0),
            best3_deadlift_kg: None,
            ..Default::default()
        };
        assert_eq!(LiftType::Bench.best_result(&rec), Some(100.0));
        assert_eq!(LiftType::Squat.best_result(&rec), Some(150.0));
        assert_eq!(LiftType::Deadlift.best_result(&rec), None);
        assert_eq!(LiftType::Squat.best_result_column().name(), "Best3SquatKg");
        assert_eq!("deadlift".parse::<LiftType>(), Ok(LiftType::Deadlift));
        assert!("curl".parse::<LiftType>().is_err());
    }

    #[test]
    fn empty_filter_values_are_absent() {
        let rec = LiftRecord {
            sex: "F".into(),
            ..Default::default()
        };
        assert_eq!(FilterColumn::Sex.value_of(&rec), Some("F"));
        assert_eq!(FilterColumn::Equipment.value_of(&rec), None);
    }
}
