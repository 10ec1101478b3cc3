mod occurrence_dto;

pub use occurrence_dto::{
    display_timestamp, CategoryCountDto, CreatedIdDto, OccurrenceDetailDto, OccurrenceDto,
    OccurrenceStatsDto, ResponseDto, SubmitOccurrenceDto,
};
