// src/handlers/servers.rs
use crate::handlers::Dashboard;
use crate::session::store::ViewState;
use crate::session::sync::decode_query;
use crate::view::{render, Column, ColumnVisibility, SortState};
use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use url::form_urlencoded;

const MAX_PAGE_SIZE: usize = 500;

/// Table/grouping options that ride along with the synchronized parameters.
#[derive(Debug, Default, PartialEq, Eq)]
struct DisplayParams {
    page: Option<usize>,
    page_size: Option<usize>,
    sort: Option<Column>,
    descending: bool,
    columns: Option<Vec<Column>>,
    multi_select: bool,
}

impl DisplayParams {
    fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "page" => params.page = value.parse().ok(),
                "pageSize" => {
                    params.page_size = value
                        .parse::<usize>()
                        .ok()
                        .filter(|size| *size > 0)
                        .map(|size| size.min(MAX_PAGE_SIZE))
                }
                "sort" => params.sort = Column::parse(&value),
                "order" => params.descending = value == "desc",
                "columns" => {
                    params.columns = Some(
                        value
                            .split(',')
                            .filter_map(|id| Column::parse(id.trim()))
                            .collect(),
                    )
                }
                "multiSelect" => params.multi_select = matches!(&*value, "1" | "true"),
                _ => {}
            }
        }
        params
    }
}

fn view_state(query: &str, dashboard: &Dashboard) -> ViewState {
    let synced = decode_query(query, &dashboard.registry);
    let display = DisplayParams::parse(query);
    debug!("Rendering {:?} with {:?}", synced, display);

    let mut state = ViewState::new(display.page_size.unwrap_or(dashboard.default_page_size));
    state.replace_filter(synced.filter_state(display.multi_select));
    state.set_view_mode(synced.view_mode);
    if let Some(column) = display.sort {
        state.set_sort(SortState::new(column, display.descending));
    }
    if let Some(columns) = display.columns {
        state.set_columns(ColumnVisibility::only(&columns));
    }
    if let Some(page) = display.page {
        state.set_page_index(page);
    }
    state
}

pub async fn get_servers(req: HttpRequest, dashboard: web::Data<Dashboard>) -> HttpResponse {
    let state = view_state(req.query_string(), &dashboard);
    let records = dashboard.store.records();
    let view = render(&records, &state, &dashboard.registry, &dashboard.catalog);
    HttpResponse::Ok().json(view)
}
