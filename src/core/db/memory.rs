//! In-memory campus store.
//!
//! Mirrors the filtering and ordering rules of the MySQL queries over plain
//! vectors, so tool behaviour can be exercised without a database.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

use super::record::DATETIME_FORMAT;
use super::{
    CampusStore, DeletedSchedule, NewSchedule, Record, ScheduleKind, StoreError, StoreResult,
};

/// Text layouts a meal date may be stored in.
const MEAL_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// How a meal's date column was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDate {
    /// A proper DATE value.
    Date(NaiveDate),
    /// Free text, hopefully in one of the known layouts.
    Text(String),
}

impl StoredDate {
    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => MEAL_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok()),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    fn sort_key(&self) -> String {
        match self {
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct MealRow {
    id: i64,
    category: String,
    date: StoredDate,
    meal: String,
}

#[derive(Debug, Clone)]
struct ExamRow {
    id: i64,
    subject_name: Option<String>,
    professor: Option<String>,
}

#[derive(Debug, Clone)]
struct ScheduleRow {
    id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    content: String,
    kind: ScheduleKind,
    owner: Option<String>,
    created_at: NaiveDateTime,
}

impl ScheduleRow {
    fn visible_to(&self, viewer: Option<&str>) -> bool {
        match self.kind {
            ScheduleKind::Common => true,
            ScheduleKind::Personal => viewer.is_some() && self.owner.as_deref() == viewer,
        }
    }

    fn matches_date_token(&self, token: &str) -> bool {
        [self.start, self.end].iter().any(|dt| {
            dt.date().format("%Y-%m-%d").to_string().contains(token)
                || dt.format("%Y-%m-%d %H:%M:%S").to_string().contains(token)
        })
    }

    fn to_record(&self) -> Record {
        let value = json!({
            "id": self.id,
            "start_date": self.start.format(DATETIME_FORMAT).to_string(),
            "end_date": self.end.format(DATETIME_FORMAT).to_string(),
            "content": self.content,
            "type": self.kind.as_str(),
            "user_id": self.owner,
            "created_at": self.created_at.format(DATETIME_FORMAT).to_string(),
        });
        into_record(value)
    }
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    meals: Vec<MealRow>,
    notices: Vec<Record>,
    exams: Vec<ExamRow>,
    schedules: Vec<ScheduleRow>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Campus store held entirely in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    writes_enabled: bool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty, writable store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            writes_enabled: true,
        }
    }

    /// Create an empty store that refuses writes, like an unconfigured database.
    pub fn read_only() -> Self {
        Self {
            writes_enabled: false,
            ..Self::new()
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a meal row.
    pub fn add_meal(&self, category: &str, date: StoredDate, meal: &str) -> i64 {
        let mut tables = self.tables();
        let id = tables.allocate_id();
        tables.meals.push(MealRow {
            id,
            category: category.to_string(),
            date,
            meal: meal.to_string(),
        });
        id
    }

    /// Seed a notice row. `extra` columns are carried through untouched.
    pub fn add_notice(&self, title: &str, extra: Record) -> i64 {
        let mut tables = self.tables();
        let id = tables.allocate_id();
        let mut record = Record::new();
        record.insert("id".to_string(), json!(id));
        record.insert("title".to_string(), json!(title));
        record.extend(extra);
        tables.notices.push(record);
        id
    }

    /// Seed an exam row.
    pub fn add_exam(&self, subject_name: Option<&str>, professor: Option<&str>) -> i64 {
        let mut tables = self.tables();
        let id = tables.allocate_id();
        tables.exams.push(ExamRow {
            id,
            subject_name: subject_name.map(str::to_string),
            professor: professor.map(str::to_string),
        });
        id
    }

    /// Seed a schedule row of any kind.
    pub fn add_schedule(
        &self,
        kind: ScheduleKind,
        owner: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        content: &str,
    ) -> i64 {
        let mut tables = self.tables();
        let id = tables.allocate_id();
        tables.schedules.push(ScheduleRow {
            id,
            start,
            end,
            content: content.to_string(),
            kind,
            owner: owner.map(str::to_string),
            created_at: start,
        });
        id
    }

    /// Number of schedule rows currently stored.
    pub fn schedule_count(&self) -> usize {
        self.tables().schedules.len()
    }

    fn visible_schedules<F>(&self, viewer: Option<&str>, filter: F) -> Vec<Record>
    where
        F: Fn(&ScheduleRow) -> bool,
    {
        let tables = self.tables();
        let mut rows: Vec<&ScheduleRow> = tables
            .schedules
            .iter()
            .filter(|row| row.visible_to(viewer) && filter(*row))
            .collect();
        rows.sort_by_key(|row| row.start);
        rows.into_iter().map(ScheduleRow::to_record).collect()
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.writes_enabled {
            Ok(())
        } else {
            Err(StoreError::MissingConfig)
        }
    }
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn meal_record(row: &MealRow) -> Record {
    into_record(json!({
        "id": row.id,
        "category": row.category,
        "date": row.date.to_value(),
        "meal": row.meal,
    }))
}

fn sorted_meals<'a>(rows: impl Iterator<Item = &'a MealRow>) -> Vec<Record> {
    let mut rows: Vec<&MealRow> = rows.collect();
    rows.sort_by_key(|row| row.date.sort_key());
    rows.into_iter().map(meal_record).collect()
}

#[async_trait]
impl CampusStore for InMemoryStore {
    async fn meals_by_date_category(
        &self,
        date_iso: &str,
        category: &str,
    ) -> StoreResult<Vec<Record>> {
        let wanted = NaiveDate::parse_from_str(date_iso, "%Y-%m-%d").ok();
        let category = category.to_lowercase();
        let tables = self.tables();
        Ok(sorted_meals(tables.meals.iter().filter(|row| {
            row.category.to_lowercase() == category
                && wanted.is_some()
                && row.date.as_date() == wanted
        })))
    }

    async fn meals_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>> {
        let tables = self.tables();
        Ok(sorted_meals(
            tables.meals.iter().filter(|row| row.meal.contains(keyword)),
        ))
    }

    async fn notices_by_keyword(&self, keyword: &str) -> StoreResult<Vec<Record>> {
        let tables = self.tables();
        Ok(tables
            .notices
            .iter()
            .filter(|record| {
                record
                    .get("title")
                    .and_then(Value::as_str)
                    .is_some_and(|title| title.contains(keyword))
            })
            .cloned()
            .collect())
    }

    async fn exams(&self, keyword: &str, professor: Option<&str>) -> StoreResult<Vec<Record>> {
        let tables = self.tables();
        let mut rows: Vec<&ExamRow> = tables
            .exams
            .iter()
            .filter(|row| {
                let subject_ok = row
                    .subject_name
                    .as_deref()
                    .is_some_and(|s| s.contains(keyword));
                let professor_ok = match professor {
                    Some(wanted) => row.professor.as_deref().is_some_and(|p| p.contains(wanted)),
                    None => true,
                };
                subject_ok && professor_ok
            })
            .collect();
        rows.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));
        Ok(rows
            .into_iter()
            .map(|row| {
                into_record(json!({
                    "id": row.id,
                    "subject_name": row.subject_name,
                    "professor": row.professor,
                }))
            })
            .collect())
    }

    async fn schedules_by_keyword(
        &self,
        keyword: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>> {
        Ok(self.visible_schedules(viewer, |row| row.content.contains(keyword)))
    }

    async fn schedules_by_date(
        &self,
        date_token: &str,
        viewer: Option<&str>,
    ) -> StoreResult<Vec<Record>> {
        Ok(self.visible_schedules(viewer, |row| row.matches_date_token(date_token)))
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> StoreResult<u64> {
        self.ensure_writable()?;
        let mut tables = self.tables();
        let id = tables.allocate_id();
        tables.schedules.push(ScheduleRow {
            id,
            start: schedule.start.naive_local(),
            end: schedule.end.naive_local(),
            content: schedule.content.clone(),
            kind: ScheduleKind::Personal,
            owner: Some(schedule.owner.clone()),
            created_at: schedule.created_at.naive_local(),
        });
        Ok(id as u64)
    }

    async fn delete_personal_schedules(
        &self,
        content_keyword: &str,
        owner: &str,
    ) -> StoreResult<Vec<DeletedSchedule>> {
        self.ensure_writable()?;
        let mut tables = self.tables();
        let is_target = |row: &ScheduleRow| {
            row.kind == ScheduleKind::Personal
                && row.owner.as_deref() == Some(owner)
                && row.content.contains(content_keyword)
        };

        let deleted: Vec<DeletedSchedule> = tables
            .schedules
            .iter()
            .filter(|row| is_target(*row))
            .map(|row| DeletedSchedule {
                id: row.id,
                content: row.content.clone(),
            })
            .collect();
        tables.schedules.retain(|row| !is_target(row));
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_meal_date_tolerates_storage_formats() {
        let store = InMemoryStore::new();
        store.add_meal(
            "lunch",
            StoredDate::Date(NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()),
            "비빔밥",
        );
        store.add_meal("LUNCH", StoredDate::Text("2025.08.27".into()), "김치찌개");
        store.add_meal("lunch", StoredDate::Text("2025/08/27".into()), "돈까스");
        store.add_meal("dinner", StoredDate::Text("2025-08-27".into()), "라면");
        store.add_meal("lunch", StoredDate::Text("2025-08-28".into()), "카레");

        let rows = store
            .meals_by_date_category("2025-08-27", "Lunch")
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r["category"].as_str().unwrap().eq_ignore_ascii_case("lunch")));
    }

    #[tokio::test]
    async fn test_meal_bad_date_matches_nothing() {
        let store = InMemoryStore::new();
        store.add_meal("lunch", StoredDate::Text("garbage".into()), "국수");
        let rows = store.meals_by_date_category("garbage", "lunch").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_exam_null_columns_never_match() {
        let store = InMemoryStore::new();
        store.add_exam(Some("자료구조"), None);
        store.add_exam(None, Some("김교수"));
        store.add_exam(Some("자료구조"), Some("김교수"));

        assert_eq!(store.exams("자료", None).await.unwrap().len(), 2);
        assert_eq!(store.exams("자료", Some("김")).await.unwrap().len(), 1);
        assert_eq!(store.exams("", Some("김")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_schedule_date_token_is_loose() {
        let store = InMemoryStore::new();
        store.add_schedule(
            ScheduleKind::Common,
            None,
            dt(2025, 10, 21, 9),
            dt(2025, 10, 23, 18),
            "중간고사",
        );

        for token in ["2025-10-21", "10-21", "10-23", "2025-10", "09:00"] {
            let rows = store.schedules_by_date(token, None).await.unwrap();
            assert_eq!(rows.len(), 1, "token {token}");
        }
        assert!(store.schedules_by_date("10-22", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedules_sorted_by_start() {
        let store = InMemoryStore::new();
        store.add_schedule(ScheduleKind::Common, None, dt(2025, 12, 1, 0), dt(2025, 12, 1, 0), "기말");
        store.add_schedule(ScheduleKind::Common, None, dt(2025, 10, 1, 0), dt(2025, 10, 1, 0), "중간");

        let rows = store.schedules_by_keyword("", None).await.unwrap();
        let contents: Vec<_> = rows.iter().map(|r| r["content"].as_str().unwrap()).collect();
        assert_eq!(contents, vec!["중간", "기말"]);
    }

    #[tokio::test]
    async fn test_read_only_refuses_writes() {
        let store = InMemoryStore::read_only();
        let err = store.delete_personal_schedules("x", "1").await.unwrap_err();
        assert!(err.is_config());
    }
}
