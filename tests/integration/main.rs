mod file_source;
mod helpers;
mod lifecycle;
mod scenarios;
