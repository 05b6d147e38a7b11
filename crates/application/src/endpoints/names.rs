//! Registered endpoint names

pub const REFRESH_TOKEN: &str = "refreshToken";
pub const LOAD_USER: &str = "loadUser";
pub const REGISTER_USER: &str = "registerUser";
pub const LOGGED_IN_USER: &str = "loggedInUser";
pub const LOGOUT_USER: &str = "logoutUser";
pub const FORGOT_PASSWORD: &str = "forgotPassword";
pub const RESET_PASSWORD: &str = "resetPassword";

pub const REGISTER_ADMIN: &str = "registerAdmin";
pub const LOGGED_IN_ADMIN: &str = "loggedInAdmin";
pub const LOGOUT_ADMIN: &str = "logoutAdmin";

pub const LIST_USERS: &str = "listUsers";
pub const GET_USER: &str = "getUser";
pub const CREATE_USER: &str = "createUser";
pub const UPDATE_USER: &str = "updateUser";
pub const UPDATE_USER_ROLE: &str = "updateUserRole";
pub const UPDATE_USER_PASSWORD: &str = "updateUserPassword";
pub const DELETE_USER: &str = "deleteUser";

pub const GET_PROJECTS: &str = "getProjects";
pub const GET_PROJECT: &str = "getProject";
pub const CREATE_PROJECT: &str = "createProject";
pub const GENERATE_SEGMENTS: &str = "generateSegments";
