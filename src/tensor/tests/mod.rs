mod new;
mod property;
mod save_load;
