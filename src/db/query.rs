//! Read-only analytical queries over the `weather` table.
//!
//! Each query returns a [`QueryTable`] whose shape is only known at run time,
//! so the console can print it and the exporter can write it without knowing
//! the columns in advance.

use rusqlite::{types::Value, Connection, Params, Statement};

use crate::{error::QueryError, reading::units::round_to};

pub const ALL_RECORDS: &str = "
    SELECT id, city, time, temperature_f AS temp_f, weather, wind_mph, humidity_pct
    FROM weather
    ORDER BY time DESC, id DESC";

pub const LATEST_RECORDS: &str = "
    SELECT city, time, temperature_f, weather, humidity_pct
    FROM weather
    ORDER BY time DESC, id DESC
    LIMIT 5";

pub const HUMIDITY_DISTRIBUTION: &str = "
    SELECT
        CASE
            WHEN humidity_pct < 30 THEN 'Low (0-29%)'
            WHEN humidity_pct < 60 THEN 'Medium (30-59%)'
            WHEN humidity_pct < 80 THEN 'High (60-79%)'
            ELSE 'Very High (80-100%)'
        END AS humidity_range,
        COUNT(*) AS count,
        ROUND(AVG(temperature_f), 1) AS avg_temp_f
    FROM weather
    WHERE humidity_pct IS NOT NULL
    GROUP BY humidity_range
    ORDER BY MIN(humidity_pct)";

pub const WIND_ANALYSIS: &str = "
    SELECT
        city,
        MIN(wind_mph) AS min_wind_mph,
        MAX(wind_mph) AS max_wind_mph,
        ROUND(AVG(wind_mph), 1) AS avg_wind_mph,
        ROUND(MIN(wind_kmh), 1) AS min_wind_kmh,
        ROUND(MAX(wind_kmh), 1) AS max_wind_kmh,
        ROUND(AVG(wind_kmh), 1) AS avg_wind_kmh
    FROM weather
    WHERE wind_mph IS NOT NULL
    GROUP BY city
    ORDER BY city";

pub const CONDITIONS: &str = "
    SELECT
        weather AS condition,
        COUNT(*) AS occurrences,
        ROUND(AVG(temperature_f), 1) AS avg_temp_f,
        ROUND(AVG(humidity_pct), 1) AS avg_humidity
    FROM weather
    WHERE weather IS NOT NULL AND weather != ''
    GROUP BY weather
    ORDER BY occurrences DESC, weather";

pub const DATES: &str = "SELECT DISTINCT date FROM weather ORDER BY date DESC";

pub const DATE_SUMMARY: &str = "
    SELECT
        date,
        COUNT(*) AS record_count,
        ROUND(AVG(temperature_f), 1) AS avg_temp_f,
        ROUND(AVG(humidity_pct), 1) AS avg_humidity
    FROM weather
    GROUP BY date
    ORDER BY date DESC";

pub const DATE_ROWS: &str = "
    SELECT city, time, temperature_f, weather, wind_mph, humidity_pct
    FROM weather
    WHERE date = ?1
    ORDER BY city, time";

pub const EXPORT_ALL: &str = "SELECT * FROM weather ORDER BY id";

/// One extremal lookup: a title and the column whose maximum or minimum it finds.
#[derive(Debug, Clone, Copy)]
pub struct Extreme {
    pub title: &'static str,
    pub column: &'static str,
    pub highest: bool,
}

pub const EXTREMES: [Extreme; 4] = [
    Extreme {
        title: "Hottest Recorded",
        column: "temperature_f",
        highest: true,
    },
    Extreme {
        title: "Coldest Recorded",
        column: "temperature_f",
        highest: false,
    },
    Extreme {
        title: "Windiest Recorded",
        column: "wind_mph",
        highest: true,
    },
    Extreme {
        title: "Most Humid Recorded",
        column: "humidity_pct",
        highest: true,
    },
];

impl Extreme {
    pub fn sql(&self) -> String {
        let aggregate = if self.highest { "MAX" } else { "MIN" };
        format!(
            "SELECT city, time, {col}, temperature_f, weather, humidity_pct, wind_mph
             FROM weather
             WHERE {col} = (SELECT {agg}({col}) FROM weather)
             ORDER BY time
             LIMIT 5",
            col = self.column,
            agg = aggregate
        )
    }
}

/// Rows of dynamically typed values under named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(format_value).collect())
            .collect()
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Runs one of the fixed menu queries.
pub fn run_table<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<QueryTable, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    collect(&mut stmt, params)
}

/// Runs operator-supplied SQL, refusing anything that could write.
pub fn run_read_only(conn: &Connection, sql: &str) -> Result<QueryTable, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    if !stmt.readonly() {
        return Err(QueryError::NotReadOnly);
    }
    collect(&mut stmt, [])
}

fn collect<P: Params>(stmt: &mut Statement<'_>, params: P) -> Result<QueryTable, QueryError> {
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let rows = stmt
        .query_map(params, |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<Value>>>()
        })?
        .collect::<rusqlite::Result<Vec<Vec<Value>>>>()?;

    Ok(QueryTable { columns, rows })
}

pub fn available_dates(conn: &Connection) -> Result<Vec<String>, QueryError> {
    let mut stmt = conn.prepare(DATES)?;
    let dates = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(dates)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureStats {
    pub city: String,
    pub count: usize,
    pub min_f: f64,
    pub max_f: f64,
    pub avg_f: f64,
    pub min_c: f64,
    pub max_c: f64,
    pub avg_c: f64,
}

/// Per-city temperature aggregates over rows with a temperature.
pub fn temperature_stats(conn: &Connection) -> Result<Vec<TemperatureStats>, QueryError> {
    let mut stmt = conn.prepare(
        "SELECT city, COUNT(*),
                MIN(temperature_f), MAX(temperature_f), AVG(temperature_f),
                MIN(temperature_c), MAX(temperature_c), AVG(temperature_c)
         FROM weather
         WHERE temperature_f IS NOT NULL
         GROUP BY city
         ORDER BY city",
    )?;

    let stats = stmt
        .query_map([], |row| {
            Ok(TemperatureStats {
                city: row.get(0)?,
                count: row.get::<_, i64>(1)? as usize,
                min_f: row.get(2)?,
                max_f: row.get(3)?,
                avg_f: row.get(4)?,
                min_c: row.get(5)?,
                max_c: row.get(6)?,
                avg_c: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(stats)
}

/// Lays temperature aggregates out for printing, one decimal place.
pub fn temperature_table(stats: &[TemperatureStats]) -> QueryTable {
    let columns = [
        "city",
        "total_records",
        "min_temp_f",
        "max_temp_f",
        "avg_temp_f",
        "min_temp_c",
        "max_temp_c",
        "avg_temp_c",
    ];

    let rows = stats
        .iter()
        .map(|s| {
            let mut row = vec![Value::Text(s.city.clone()), Value::Integer(s.count as i64)];
            row.extend(
                [s.min_f, s.max_f, s.avg_f, s.min_c, s.max_c, s.avg_c]
                    .into_iter()
                    .map(|v| Value::Real(round_to(v, 1))),
            );
            row
        })
        .collect();

    QueryTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

// -- Tests -------------------------------------------------------------------
