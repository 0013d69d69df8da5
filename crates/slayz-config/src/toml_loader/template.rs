//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Slayz server configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# bind = "0.0.0.0"
# port = 3000
# outbox_capacity = 256   # frames queued per connection before drops

[store]
# backend = "json"        # json, memory
# data_dir = "data"       # one <collection>.json file per collection

[logging]
# filter = "slayz_relay=info,slayz_core=info,slayz_store=info"   # RUST_LOG wins when set
"##
}
