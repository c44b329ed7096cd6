//! SQLite implementation of the EmployeeRepository.

use async_trait::async_trait;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Employee, EmployeeId, LinkField, TeamSize};
use crate::domain::ports::{
    EmployeeFilter, EmployeeRepository, EmployeeTransaction, EmployeeUpdate, FieldAssignment,
    TeamSizeFilter,
};

const EMPLOYEE_COLUMNS: &str = "employee_id, first_name, last_name, department, job_title, job_level, \
     location, region, manager_id, joining_date, exit_date, performance_rating, tenure_years, \
     is_active, supervisor_id";

pub struct SqliteEmployeeRepository {
    pool: SqlitePool,
}

impl SqliteEmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for SqliteEmployeeRepository {
    async fn begin(&self) -> DomainResult<Box<dyn EmployeeTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteEmployeeTransaction { tx }))
    }

    async fn insert(&self, employee: &Employee) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO employees (employee_id, first_name, last_name, department, job_title, job_level,
                   location, region, manager_id, joining_date, exit_date, performance_rating, tenure_years,
                   is_active, supervisor_id)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(employee.employee_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.department)
        .bind(&employee.job_title)
        .bind(employee.job_level)
        .bind(&employee.location)
        .bind(&employee.region)
        .bind(employee.manager_id)
        .bind(&employee.joining_date)
        .bind(&employee.exit_date)
        .bind(employee.performance_rating)
        .bind(employee.tenure_years)
        .bind(employee.is_active)
        .bind(employee.supervisor_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: EmployeeId) -> DomainResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?");
        let row: Option<EmployeeRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Employee::from))
    }

    async fn list(&self, filter: &EmployeeFilter) -> DomainResult<Vec<Employee>> {
        select_rows(&self.pool, filter).await
    }

    async fn count(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.unsigned_abs())
    }

    async fn team_sizes(&self, field: LinkField, filter: &TeamSizeFilter) -> DomainResult<Vec<TeamSize>> {
        let column = field.column();
        let mut where_clause = format!("e.{column} IS NOT NULL");
        let mut values = Vec::new();

        if let Some(department) = &filter.department {
            where_clause.push_str(" AND e.department = ?");
            values.push(SqlValue::Text(department.clone()));
        }
        if let Some(region) = &filter.region {
            where_clause.push_str(" AND e.region = ?");
            values.push(SqlValue::Text(region.clone()));
        }
        if let Some(location) = &filter.location {
            where_clause.push_str(" AND e.location = ?");
            values.push(SqlValue::Text(location.clone()));
        }

        let mut sql = format!(
            r#"SELECT e.{column} AS leader_id,
                      TRIM(COALESCE(m.first_name, ''))
                        || CASE WHEN TRIM(COALESCE(m.first_name, '')) <> '' AND TRIM(COALESCE(m.last_name, '')) <> ''
                                THEN ' ' ELSE '' END
                        || TRIM(COALESCE(m.last_name, '')) AS leader_name,
                      COUNT(e.employee_id) AS team_size
               FROM employees e
               LEFT JOIN employees m ON m.employee_id = e.{column}
               WHERE {where_clause}
               GROUP BY e.{column}
               ORDER BY team_size DESC, leader_id ASC"#
        );
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows: Vec<(i64, String, i64)> = bind_values(sqlx::query_as(&sql), &values)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(leader_id, leader_name, team_size)| TeamSize {
                leader_id,
                leader_name,
                team_size: team_size.unsigned_abs(),
            })
            .collect())
    }
}

/// One repair pass worth of writes on a single `SQLite` transaction.
pub struct SqliteEmployeeTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl EmployeeTransaction for SqliteEmployeeTransaction {
    async fn select(&mut self, filter: &EmployeeFilter) -> DomainResult<Vec<Employee>> {
        select_rows(&mut *self.tx, filter).await
    }

    async fn select_ids(&mut self, filter: &EmployeeFilter) -> DomainResult<Vec<EmployeeId>> {
        let (clause, values) = filter_clause(filter);
        let sql = format!("SELECT employee_id FROM employees{clause} ORDER BY employee_id");
        let rows: Vec<(i64,)> = bind_values(sqlx::query_as(&sql), &values)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn count_reports(&mut self, field: LinkField, leader_id: EmployeeId) -> DomainResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM employees WHERE {} = ?", field.column());
        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(leader_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count.unsigned_abs())
    }

    async fn update_many(&mut self, updates: &[EmployeeUpdate]) -> DomainResult<u64> {
        let mut touched = 0;
        for update in updates {
            touched += apply_update(&mut self.tx, update).await?;
        }
        Ok(touched)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

enum SqlValue {
    Text(String),
    Integer(i64),
}

/// `WHERE` clause for `filter`, with its values in placeholder order.
fn filter_clause(filter: &EmployeeFilter) -> (String, Vec<SqlValue>) {
    let mut clause = String::from(" WHERE 1=1");
    let mut values = Vec::new();

    if let Some(department) = &filter.department {
        clause.push_str(" AND department = ?");
        values.push(SqlValue::Text(department.clone()));
    }
    if let Some(job_level) = filter.job_level {
        clause.push_str(" AND job_level = ?");
        values.push(SqlValue::Integer(job_level));
    }
    if let Some(region) = &filter.region {
        clause.push_str(" AND region = ?");
        values.push(SqlValue::Text(region.clone()));
    }
    if let Some(location) = &filter.location {
        clause.push_str(" AND location = ?");
        values.push(SqlValue::Text(location.clone()));
    }
    if let Some(field) = filter.missing_link {
        clause.push_str(&format!(" AND {} IS NULL", field.column()));
    }
    if filter.has_any_link {
        clause.push_str(" AND (manager_id IS NOT NULL OR supervisor_id IS NOT NULL)");
    }

    (clause, values)
}

fn bind_values<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    values: &'q [SqlValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            SqlValue::Text(text) => query.bind(text.as_str()),
            SqlValue::Integer(number) => query.bind(*number),
        };
    }
    query
}

async fn select_rows<'c, E>(executor: E, filter: &EmployeeFilter) -> DomainResult<Vec<Employee>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let (clause, values) = filter_clause(filter);
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees{clause} ORDER BY employee_id");
    let rows: Vec<EmployeeRow> = bind_values(sqlx::query_as(&sql), &values)
        .fetch_all(executor)
        .await?;
    Ok(rows.into_iter().map(Employee::from).collect())
}

async fn apply_update(conn: &mut SqliteConnection, update: &EmployeeUpdate) -> DomainResult<u64> {
    if update.assignments.is_empty() {
        return Ok(0);
    }

    let sets: Vec<String> = update
        .assignments
        .iter()
        .map(|assignment| format!("{} = ?", assignment.column()))
        .collect();
    let sql = format!("UPDATE employees SET {} WHERE employee_id = ?", sets.join(", "));

    let mut query = sqlx::query(&sql);
    for assignment in &update.assignments {
        query = match assignment {
            FieldAssignment::Link(_, leader) => query.bind(*leader),
            FieldAssignment::JoiningDate(date) => query.bind(date.as_str()),
            FieldAssignment::ExitDate(date) => query.bind(date.as_deref()),
            FieldAssignment::TenureYears(years) => query.bind(*years),
        };
    }

    let result = query.bind(update.employee_id).execute(conn).await?;
    Ok(result.rows_affected())
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    employee_id: i64,
    first_name: String,
    last_name: String,
    department: Option<String>,
    job_title: Option<String>,
    job_level: Option<i64>,
    location: Option<String>,
    region: Option<String>,
    manager_id: Option<i64>,
    joining_date: String,
    exit_date: Option<String>,
    performance_rating: Option<i64>,
    tenure_years: Option<f64>,
    is_active: Option<bool>,
    supervisor_id: Option<i64>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            department: row.department,
            job_title: row.job_title,
            job_level: row.job_level,
            location: row.location,
            region: row.region,
            manager_id: row.manager_id,
            supervisor_id: row.supervisor_id,
            joining_date: row.joining_date,
            exit_date: row.exit_date,
            performance_rating: row.performance_rating,
            tenure_years: row.tenure_years,
            is_active: row.is_active.unwrap_or(false),
        }
    }
}
