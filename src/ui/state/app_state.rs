use dioxus::prelude::{use_signal, Signal};

pub struct AppState {
    pub status: Signal<String>,
    pub revision: Signal<u64>,
    pub save_as_name: Signal<String>,
    pub save_as_shared: Signal<bool>,
    pub save_as_default: Signal<bool>,
    pub rename_input: Signal<String>,
    pub quick_search: Signal<String>,
    pub show_column_editor: Signal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: use_signal(|| "Ready".to_string()),
            revision: use_signal(|| 0_u64),
            save_as_name: use_signal(String::new),
            save_as_shared: use_signal(|| false),
            save_as_default: use_signal(|| false),
            rename_input: use_signal(String::new),
            quick_search: use_signal(String::new),
            show_column_editor: use_signal(|| false),
        }
    }
}
