use teamgate_misc::api::{Query, Value};

pub struct Select {
    fields: Vec<&'static str>,
    table: &'static str,

    wheres: Vec<String>,

    limit: bool,
    offset: bool,

    order_by: Vec<&'static str>,

    values: Vec<Value>,

    count: bool,
}

impl Select {
    pub fn new(fields: Vec<&'static str>, table: &'static str) -> Self {
        Self {
            fields,
            table,
            wheres: Vec::new(),
            limit: false,
            offset: false,
            order_by: Vec::new(),
            values: Vec::new(),
            count: false,
        }
    }

    pub fn count(table: &'static str) -> Self {
        Self {
            fields: vec!["COUNT(1)"],
            table,
            wheres: Vec::new(),
            limit: false,
            offset: false,
            order_by: Vec::new(),
            values: Vec::new(),
            count: true,
        }
    }

    pub fn add_order_by(&mut self, s: &'static str) {
        if self.count {
            return;
        }
        self.order_by.push(s);
    }

    pub fn add_where(&mut self, s: impl ToString, value: Value) {
        self.wheres.push(s.to_string());
        self.values.push(value);
    }

    pub fn set_query(&mut self, query: Query, search_field: &str) {
        if let Some(search) = query.search {
            let search = format!("%{search}%");
            self.add_where(format!("{search_field} LIKE ?"), Value::Text(search));
        }

        if let Some(owner) = query.owner {
            self.add_where("owner_user_id = ?", Value::Text(owner));
        }

        if self.count {
            return;
        }

        if let Some(limit) = query.limit {
            self.limit = true;
            self.values.push(Value::Integer(limit));
            if let Some(offset) = query.offset {
                self.offset = true;
                self.values.push(Value::Integer(offset));
            }
        }
    }

    pub fn build(self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", self.fields.join(", "), self.table);

        if !self.wheres.is_empty() {
            let where_clause = self.wheres.join(" AND ");
            sql.push_str(&format!(" WHERE {}", where_clause));
        }

        if !self.order_by.is_empty() {
            let order_by = self.order_by.join(", ");
            sql.push_str(&format!(" ORDER BY {}", order_by));
        }

        if self.limit {
            sql.push_str(" LIMIT ?");
            if self.offset {
                sql.push_str(" OFFSET ?");
            }
        }

        (sql, self.values)
    }
}

pub struct Update {
    table: &'static str,

    fields: Vec<&'static str>,
    wheres: Vec<String>,
    values: Vec<Value>,
}

impl Update {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
            wheres: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: &'static str, value: Value) {
        self.fields.push(field);
        self.values.push(value);
    }

    pub fn add_where(&mut self, s: impl ToString, value: Value) {
        self.wheres.push(s.to_string());
        self.values.push(value);
    }

    pub fn build(self) -> (String, Vec<Value>) {
        if self.fields.is_empty() {
            return (String::new(), Vec::new());
        }
        let mut sql = format!("UPDATE {} SET ", self.table);
        let set = self
            .fields
            .iter()
            .map(|f| format!("{} = ?", f))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&set);

        if !self.wheres.is_empty() {
            let where_clause = self.wheres.join(" AND ");
            sql.push_str(&format!(" WHERE {}", where_clause));
        }

        (sql, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        let mut select = Select::new(vec!["id", "name"], "team");
        select.add_where("workspace_id = ?", Value::Text("ws1".to_string()));
        select.add_order_by("update_time DESC");
        let (sql, values) = select.build();
        assert_eq!(
            sql,
            "SELECT id, name FROM team WHERE workspace_id = ? ORDER BY update_time DESC"
        );
        assert_eq!(values.len(), 1);

        let mut select = Select::count("team");
        select.set_query(
            Query {
                search: Some("eng".to_string()),
                limit: Some(10),
                offset: Some(5),
                ..Default::default()
            },
            "name",
        );
        let (sql, values) = select.build();
        // Count queries ignore pagination
        assert_eq!(sql, "SELECT COUNT(1) FROM team WHERE name LIKE ?");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_select_pagination() {
        let mut select = Select::new(vec!["id"], "workspace");
        select.set_query(
            Query {
                limit: Some(10),
                offset: Some(20),
                ..Default::default()
            },
            "name",
        );
        let (sql, values) = select.build();
        assert_eq!(sql, "SELECT id FROM workspace LIMIT ? OFFSET ?");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_update() {
        let mut update = Update::new("team");
        update.add_field("name", Value::Text("new".to_string()));
        update.add_field("update_time", Value::Integer(100));
        update.add_where("id = ?", Value::Text("team1".to_string()));
        let (sql, values) = update.build();
        assert_eq!(sql, "UPDATE team SET name = ?, update_time = ? WHERE id = ?");
        assert_eq!(values.len(), 3);

        let update = Update::new("team");
        let (sql, values) = update.build();
        assert!(sql.is_empty());
        assert!(values.is_empty());
    }
}
