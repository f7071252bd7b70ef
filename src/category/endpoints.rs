//! Category listing and creation endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Session,
    category::{Category, CategoryFormData},
    directory::{add_category, get_categories},
    routing::{CreatedResponse, write_request_body},
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every category.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))
        .map(Json)
}

/// Create a category. Only admin sessions may do this.
///
/// Responds with `201 Created` and the new category's ID.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    session: Session,
    body: Result<Json<CategoryFormData>, JsonRejection>,
) -> Result<Response, Error> {
    let new_category = write_request_body(session, body)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let id = add_category(session, &new_category.name, &connection)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::State,
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error, Session,
        category::{
            CategoryFormData, CategoryName, create_category_endpoint,
            endpoints::CategoryState, get_all_categories, get_categories_endpoint,
        },
        db::initialize,
    };

    fn get_category_state() -> CategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn lists_seeded_categories() {
        let state = get_category_state();

        let Json(categories) = get_categories_endpoint(State(state)).await.unwrap();

        assert_eq!(categories.len(), 4);
        assert_eq!(categories[3].name, CategoryName::new_unchecked("Logística"));
    }

    #[tokio::test]
    async fn admin_can_create_category() {
        let state = get_category_state();
        let form = CategoryFormData {
            name: "Limpeza".to_owned(),
        };

        let response =
            create_category_endpoint(State(state.clone()), Session::Admin, Ok(Json(form)))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let categories = get_all_categories(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(
            categories.last().map(|category| category.name.as_ref()),
            Some("Limpeza")
        );
    }

    #[tokio::test]
    async fn reader_cannot_create_category() {
        let state = get_category_state();
        let form = CategoryFormData {
            name: "Limpeza".to_owned(),
        };

        let result =
            create_category_endpoint(State(state.clone()), Session::Reader, Ok(Json(form))).await;

        assert_eq!(result.unwrap_err(), Error::AuthRequired);
        assert_eq!(
            get_all_categories(&state.db_connection.lock().unwrap())
                .unwrap()
                .len(),
            4
        );
    }
}
