mod address;
mod sets;
mod tests;
