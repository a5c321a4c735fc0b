pub mod embedded_assets;
