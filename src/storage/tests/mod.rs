//! Тесты хранилища
