pub mod path;
pub mod profile_validation;
pub mod text_input;

// Export utilities that are used
pub use path::{
    default_app_dir, expand_path, format_path_for_display, get_config_dir, get_config_path,
    get_home_dir, get_log_dir, get_profile_config_path, APP_NAME,
};
pub use profile_validation::{validate_profile_name, NO_BASE_PROFILE};
pub use text_input::TextInput;
