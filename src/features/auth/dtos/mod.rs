mod auth_dto;

pub use auth_dto::{AdminSummaryDto, LoginRequestDto, LoginResponseDto};
