pub mod api;
pub mod status;

/// The one endpoint this process ever fetches.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
