mod occurrence_handler;

pub use occurrence_handler::{
    __path_get_occurrence, __path_get_stats, __path_list_occurrences, __path_submit_occurrence,
    get_occurrence, get_stats, list_occurrences, submit_occurrence,
};
