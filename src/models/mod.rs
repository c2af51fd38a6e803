pub mod user;

pub use user::{
    AccessTokenResponse, LoginRequest, LogoutRequest, NewUser, RefreshTokenRequest,
    RegisterRequest, RegisterResponse, StatusResponse, UpdateProfileRequest, User, UserChanges,
    UserOut, VerifyEmailParams,
};
