use std::fmt;
use std::sync::Mutex;

/// Application routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    MyLeads,
    LeadDetail(String),
    Dashboard,
    Login,
    Departments,
}

impl Route {
    pub const LEAD_DETAIL_TEMPLATE: &'static str = "/my-leads/{id}";

    pub fn path(&self) -> String {
        match self {
            Route::MyLeads => "/my-leads".to_string(),
            Route::LeadDetail(id) => format!("/my-leads/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Login => "/login".to_string(),
            Route::Departments => "/admin/departments".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match path {
            "/my-leads" => Some(Route::MyLeads),
            "/dashboard" => Some(Route::Dashboard),
            "/login" => Some(Route::Login),
            "/admin/departments" => Some(Route::Departments),
            _ => path
                .strip_prefix("/my-leads/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::LeadDetail(id.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
    fn back(&self);
}

/// In-memory history stack.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    stack: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            stack: Mutex::new(vec![initial.to_string()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.stack
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current().as_deref().and_then(Route::parse)
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        self.stack
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(path.to_string());
    }

    fn back(&self) {
        let mut stack = self.stack.lock().unwrap_or_else(|p| p.into_inner());
        if stack.len() > 1 {
            stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_round_trip() {
        for route in [
            Route::MyLeads,
            Route::LeadDetail("L-7".into()),
            Route::Dashboard,
            Route::Login,
            Route::Departments,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/my-leads/a/b"), None);
    }

    #[test]
    fn test_back_keeps_root() {
        let nav = HistoryNavigator::new("/my-leads");
        nav.push("/my-leads/1");
        nav.back();
        nav.back();
        assert_eq!(nav.current_route(), Some(Route::MyLeads));
    }
}
