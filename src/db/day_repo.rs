use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{Day, Item, Meal, DEFAULT_SLEEP_QUALITY};

#[derive(Clone)]
pub struct DayRepository {
    pool: SqlitePool,
}

// Row types for database queries. Numeric columns are nullable in databases
// that predate the migrations, so reads go through COALESCE.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayRow {
    pub date: String,
    pub kcal_total: i64,
    pub ptn_total: i64,
    pub carb_total: i64,
    pub fat_total: i64,
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
    pub sleep_quality: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRow {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub kcal: i64,
    pub ptn: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub meal_id: i64,
    pub name: String,
    pub kcal: i64,
    pub ptn: i64,
}

const SELECT_DAY: &str = r#"
    SELECT date,
           COALESCE(kcal_total, 0) AS kcal_total,
           COALESCE(ptn_total, 0) AS ptn_total,
           COALESCE(carb_total, 0) AS carb_total,
           COALESCE(fat_total, 0) AS fat_total,
           sleep_start, sleep_end, sleep_quality, notes
    FROM days
"#;

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl DayRow {
    fn into_day(self, meals: Vec<Meal>) -> Day {
        Day {
            date: self.date,
            kcal_total: to_u32(self.kcal_total),
            ptn_total: to_u32(self.ptn_total),
            carb_total: to_u32(self.carb_total),
            fat_total: to_u32(self.fat_total),
            sleep_start: self.sleep_start,
            sleep_end: self.sleep_end,
            sleep_quality: self
                .sleep_quality
                .unwrap_or_else(|| DEFAULT_SLEEP_QUALITY.to_string()),
            notes: self.notes.unwrap_or_default(),
            meals,
        }
    }
}

impl DayRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the day's own fields, or update them if the date exists.
    /// Meals are left untouched.
    pub async fn upsert_day(&self, day: &Day) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        write_day(&mut conn, day).await
    }

    /// Store a whole day. Its previous meals and items are replaced so that
    /// importing the same log twice leaves one copy.
    pub async fn save(&self, day: &Day) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        write_day(&mut tx, day).await?;

        sqlx::query("DELETE FROM meal_items WHERE meal_id IN (SELECT id FROM meals WHERE date = ?)")
            .bind(&day.date)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM meals WHERE date = ?")
            .bind(&day.date)
            .execute(&mut *tx)
            .await?;

        for meal in &day.meals {
            let meal_id = write_meal(&mut tx, &day.date, meal).await?;
            for item in &meal.items {
                write_item(&mut tx, meal_id, item).await?;
            }
        }

        tx.commit().await
    }

    /// Returns the generated meal id.
    pub async fn insert_meal(&self, date: &str, meal: &Meal) -> Result<i64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        write_meal(&mut conn, date, meal).await
    }

    /// Returns the generated item id.
    pub async fn insert_item(&self, meal_id: i64, item: &Item) -> Result<i64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        write_item(&mut conn, meal_id, item).await
    }

    pub async fn get_day(&self, date: &str) -> Result<Option<DayRow>, sqlx::Error> {
        sqlx::query_as(&format!("{} WHERE date = ?", SELECT_DAY))
            .bind(date)
            .fetch_optional(&self.pool)
            .await
    }

    /// All days, most recent first.
    pub async fn list_days(&self) -> Result<Vec<DayRow>, sqlx::Error> {
        sqlx::query_as(&format!("{} ORDER BY date DESC", SELECT_DAY))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn meals_for_date(&self, date: &str) -> Result<Vec<MealRow>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, date, COALESCE(name, '') AS name,
                   COALESCE(kcal, 0) AS kcal, COALESCE(ptn, 0) AS ptn
            FROM meals WHERE date = ? ORDER BY id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn items_for_meal(&self, meal_id: i64) -> Result<Vec<ItemRow>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, meal_id, COALESCE(name, '') AS name,
                   COALESCE(kcal, 0) AS kcal, COALESCE(ptn, 0) AS ptn
            FROM meal_items WHERE meal_id = ? ORDER BY id
            "#,
        )
        .bind(meal_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Every day with its meals and items, most recent first. Local meal ids
    /// are dropped; they mean nothing to any other store.
    pub async fn load_all(&self) -> Result<Vec<Day>, sqlx::Error> {
        let rows = self.list_days().await?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            let mut meals = Vec::new();
            for meal_row in self.meals_for_date(&row.date).await? {
                let items = self
                    .items_for_meal(meal_row.id)
                    .await?
                    .into_iter()
                    .map(|i| Item::new(i.name, to_u32(i.kcal), to_u32(i.ptn)))
                    .collect();
                meals.push(
                    Meal::new(meal_row.name, to_u32(meal_row.kcal), to_u32(meal_row.ptn))
                        .with_items(items),
                );
            }
            days.push(row.into_day(meals));
        }
        Ok(days)
    }
}

async fn write_day(conn: &mut SqliteConnection, day: &Day) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO days (date, kcal_total, ptn_total, carb_total, fat_total, sleep_start, sleep_end, sleep_quality, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            kcal_total = excluded.kcal_total,
            ptn_total = excluded.ptn_total,
            carb_total = excluded.carb_total,
            fat_total = excluded.fat_total,
            sleep_start = excluded.sleep_start,
            sleep_end = excluded.sleep_end,
            sleep_quality = excluded.sleep_quality,
            notes = excluded.notes
        "#,
    )
    .bind(&day.date)
    .bind(day.kcal_total)
    .bind(day.ptn_total)
    .bind(day.carb_total)
    .bind(day.fat_total)
    .bind(&day.sleep_start)
    .bind(&day.sleep_end)
    .bind(&day.sleep_quality)
    .bind(&day.notes)
    .execute(conn)
    .await?;
    Ok(())
}

async fn write_meal(
    conn: &mut SqliteConnection,
    date: &str,
    meal: &Meal,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO meals (date, name, kcal, ptn) VALUES (?, ?, ?, ?)")
        .bind(date)
        .bind(&meal.name)
        .bind(meal.kcal)
        .bind(meal.ptn)
        .execute(conn)
        .await?;
    Ok(result.last_insert_rowid())
}

async fn write_item(
    conn: &mut SqliteConnection,
    meal_id: i64,
    item: &Item,
) -> Result<i64, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO meal_items (meal_id, name, kcal, ptn) VALUES (?, ?, ?, ?)")
            .bind(meal_id)
            .bind(&item.name)
            .bind(item.kcal)
            .bind(item.ptn)
            .execute(conn)
            .await?;
    Ok(result.last_insert_rowid())
}
