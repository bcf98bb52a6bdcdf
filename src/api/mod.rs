pub mod tryhackme;
